use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm::prompts::{
    build_conflict_prompt, build_feedback_prompt, RESOLVE_SYSTEM_PROMPT, SYSTEM_PROMPT,
};
use crate::llm::validation::validate_response;
use crate::llm::FeedbackProvider;
use crate::models::{FeedbackResponse, Lens};

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;

        Ok(Self {
            api_key,
            model: "claude-sonnet-4-20250514".to_string(),
            temperature: 0.1,
            max_tokens: 5000,
        })
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            temperature: 0.1,
            max_tokens: 5000,
        }
    }
}

/// Feedback client backed by the Anthropic Messages API.
///
/// Structured output is obtained by forcing tool use against a fixed schema
/// so the positional sentence/suggestion alignment of the contract can be
/// checked mechanically at the boundary.
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Send a message with tool use and parse the structured feedback
    async fn send_with_tool(&self, system: &str, user: &str) -> Result<FeedbackResponse> {
        let tool = Tool {
            name: "submit_feedback".to_string(),
            description: "Submit the improvement feedback grouped by trait".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "improvements": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "trait": {"type": "string"},
                                "comment": {"type": "string"},
                                "sentences_needing_improvement": {
                                    "type": "array",
                                    "items": {"type": "string"}
                                },
                                "suggested_improvement": {
                                    "type": "array",
                                    "items": {"type": "string"}
                                }
                            },
                            "required": [
                                "trait",
                                "comment",
                                "sentences_needing_improvement",
                                "suggested_improvement"
                            ],
                            "additionalProperties": false
                        }
                    }
                },
                "required": ["improvements"],
                "additionalProperties": false
            }),
        };

        let request = AnthropicToolRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            system: Some(system.to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            tools: vec![tool],
            tool_choice: Some(ToolChoice {
                choice_type: "tool".to_string(),
                name: "submit_feedback".to_string(),
            }),
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error: {} - {}", status, body);
        }

        let response: AnthropicResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        // Find the tool_use content block
        for content in &response.content {
            if content.content_type == "tool_use"
                && content.name.as_deref() == Some("submit_feedback")
            {
                if let Some(input) = &content.input {
                    let feedback: FeedbackResponse = serde_json::from_value(input.clone())
                        .context("Failed to parse tool input as FeedbackResponse")?;
                    validate_response(&feedback)?;
                    return Ok(feedback);
                }
            }
        }

        anyhow::bail!("No tool_use response found")
    }
}

impl FeedbackProvider for AnthropicClient {
    async fn generate_feedback(&self, document: &str, lens: Lens) -> Result<FeedbackResponse> {
        let prompt = build_feedback_prompt(document, lens);
        self.send_with_tool(SYSTEM_PROMPT, &prompt).await
    }

    async fn resolve_conflicts(
        &self,
        previous: &FeedbackResponse,
        lens: Lens,
    ) -> Result<FeedbackResponse> {
        let serialized =
            serde_json::to_string_pretty(previous).context("Failed to serialize feedback")?;
        let prompt = build_conflict_prompt(&serialized, lens);
        self.send_with_tool(RESOLVE_SYSTEM_PROMPT, &prompt).await
    }
}

#[derive(Debug, Serialize)]
struct AnthropicToolRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    input: Option<serde_json::Value>,
}
