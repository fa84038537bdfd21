use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use relens::{
    load_document, pipeline::excerpt_around, write_document, AnthropicClient, AnthropicConfig,
    Decision, FeedbackProvider, Lens, ResolvedDiagnostic, Session, SessionReport,
};

#[derive(Parser)]
#[command(name = "relens")]
#[command(author, version, about = "Seven-lens review feedback pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all seven lenses over a review document
    Process {
        /// Input review document (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the final revised document
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for the JSON session report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Accept every suggestion without prompting
        #[arg(long, conflicts_with = "reject_all")]
        accept_all: bool,

        /// Reject every suggestion without prompting
        #[arg(long)]
        reject_all: bool,

        /// Stage numbers to skip (e.g. --skip 2 --skip 5)
        #[arg(long)]
        skip: Vec<u8>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run a single lens and print its diagnostics without mutating
    Analyze {
        /// Input review document (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Stage number (1-7)
        #[arg(short, long, default_value = "1")]
        lens: u8,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            report,
            accept_all,
            reject_all,
            skip,
            verbose,
        } => {
            setup_logging(verbose);
            process_document(input, output, report, accept_all, reject_all, skip).await
        }
        Commands::Analyze {
            input,
            lens,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_document(input, lens).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// How decisions are supplied during `process`.
enum DecisionMode {
    AcceptAll,
    RejectAll,
    Interactive,
}

async fn process_document(
    input: PathBuf,
    output: PathBuf,
    report: Option<PathBuf>,
    accept_all: bool,
    reject_all: bool,
    skip: Vec<u8>,
) -> Result<()> {
    let mode = if accept_all {
        DecisionMode::AcceptAll
    } else if reject_all {
        DecisionMode::RejectAll
    } else {
        DecisionMode::Interactive
    };

    for &n in &skip {
        if Lens::from_number(n).is_none() {
            anyhow::bail!("--skip {} is not a valid stage number (1-7)", n);
        }
    }

    info!("Loading document from {:?}", input);
    let text = load_document(&input).context("Failed to load input document")?;
    let mut session = Session::new(&text);
    info!("Session {} started ({} chars)", session.id, text.len());

    let api_config = AnthropicConfig::from_env()?;
    let client = AnthropicClient::new(api_config);

    for lens in Lens::ALL {
        if skip.contains(&lens.number()) {
            info!("Skipping {}", lens);
            session.skip_stage(lens)?;
            continue;
        }

        println!("\n=== {}: {} ===", lens.letter(), lens.title());
        let diagnostics = session.run_stage(&client, lens).await?.to_vec();
        if diagnostics.is_empty() {
            println!("No suggestions for this lens.");
        }

        let base = session.input_applied(lens).to_string();
        for (i, diagnostic) in diagnostics.iter().enumerate() {
            let decision = decide(&mode, &base, i, &diagnostics, diagnostic)?;
            session.record_decision(lens, decision)?;
        }

        session.complete_stage(lens)?;
    }

    let final_text = session
        .final_document()
        .context("Pipeline finished without a final document")?
        .to_string();

    write_document(&final_text, &output)?;
    info!("Final document written to {:?}", output);

    if let Some(report_path) = report {
        SessionReport::from_session(&session).write_json(&report_path)?;
        info!("Session report written to {:?}", report_path);
    }

    Ok(())
}

fn decide(
    mode: &DecisionMode,
    base: &str,
    index: usize,
    all: &[ResolvedDiagnostic],
    diagnostic: &ResolvedDiagnostic,
) -> Result<Decision> {
    let sentence = diagnostic.clean_sentence();
    let suggestion = diagnostic.clean_suggestion();

    match mode {
        DecisionMode::AcceptAll => Ok(Decision::accept(sentence, suggestion)),
        DecisionMode::RejectAll => Ok(Decision::reject(sentence, suggestion)),
        DecisionMode::Interactive => {
            println!("\n[{}/{}] Trait: {}", index + 1, all.len(), diagnostic.trait_name);
            println!("Comment: {}", diagnostic.comment);
            if diagnostic.low_confidence {
                println!(
                    "(low-confidence match, score {:.2}; verify the highlighted sentence)",
                    diagnostic.score
                );
            }
            println!("Context: {}", excerpt_around(base, &sentence));
            println!("Sentence:   {}", sentence);
            println!("Suggestion: {}", suggestion);

            loop {
                print!("Accept? [y/n] ");
                std::io::stdout().flush()?;
                let mut answer = String::new();
                std::io::stdin().read_line(&mut answer)?;
                match answer.trim().to_lowercase().as_str() {
                    "y" | "yes" => return Ok(Decision::accept(sentence, suggestion)),
                    "n" | "no" => return Ok(Decision::reject(sentence, suggestion)),
                    _ => println!("Please answer y or n."),
                }
            }
        }
    }
}

async fn analyze_document(input: PathBuf, lens_number: u8) -> Result<()> {
    let lens = Lens::from_number(lens_number)
        .with_context(|| format!("{} is not a valid stage number (1-7)", lens_number))?;

    info!("Loading document from {:?}", input);
    let text = load_document(&input).context("Failed to load input document")?;

    let api_config = AnthropicConfig::from_env()?;
    let client = AnthropicClient::new(api_config);

    println!("Lens Analysis: {} - {}", lens.letter(), lens.title());
    println!("==============");

    let response = client.generate_feedback(&text, lens).await?;
    let resolved = relens::pipeline::resolve_and_align(
        &client,
        lens,
        &text,
        &response,
        &relens::AlignConfig::default(),
    )
    .await?;

    if resolved.is_empty() {
        println!("No suggestions.");
        return Ok(());
    }

    for diagnostic in &resolved {
        println!();
        println!("Trait:      {}", diagnostic.trait_name);
        println!("Comment:    {}", diagnostic.comment);
        println!("Sentence:   {}", diagnostic.clean_sentence());
        println!("Suggestion: {}", diagnostic.clean_suggestion());
        if diagnostic.low_confidence {
            println!("Match:      LOW CONFIDENCE ({:.2})", diagnostic.score);
        } else {
            println!("Match:      {:.2}", diagnostic.score);
        }
    }

    println!();
    println!("{} suggestion(s).", resolved.len());
    Ok(())
}
