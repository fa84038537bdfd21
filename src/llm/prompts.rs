use crate::models::Lens;

/// System prompt for feedback generation.
pub const SYSTEM_PROMPT: &str = "You are an expert at providing feedback on peer reviews \
of research articles. You apply the E.M.P.A.T.H.Y. framework for constructive reviewing \
one dimension at a time, exactly as instructed.";

/// System prompt for the conflict-resolution call.
pub const RESOLVE_SYSTEM_PROMPT: &str = "You are expert at decision making.";

/// One-paragraph brief for a lens, shown to the service as the framework
/// excerpt for that dimension.
pub fn lens_brief(lens: Lens) -> &'static str {
    match lens {
        Lens::EndGoal => {
            "Reviewers should evaluate manuscripts by understanding the journal's scope and \
             mission, ensuring the research aligns with advancing the field and meeting \
             practical and scholarly expectations while offering constructive feedback on \
             methodology, analysis, and contribution to the journal's goals."
        }
        Lens::Mindset => {
            "A developmental mindset transforms the reviewer's role into that of a mentor, \
             emphasizing growth and refinement through constructive feedback that builds on a \
             manuscript's strengths, identifies actionable improvements, and fosters a culture \
             of academic support and advancement."
        }
        Lens::Peruse => {
            "Reviewers should deeply engage with the entirety of a manuscript to understand \
             its core problem, theoretical contributions, and intended impact, ensuring that \
             feedback is empathetic, constructive, and collaborative while rearticulating the \
             paper's goals to build credibility and provide well-grounded insights."
        }
        Lens::Allocate => {
            "Reviewers, entrusted with guiding manuscripts through their scholarly trajectory, \
             should focus on impactful, constructive feedback by prioritizing critical \
             theoretical, methodological, or empirical issues over minor refinements, thereby \
             ensuring their time is used effectively to advance the manuscript while fostering \
             a balance between rigor and innovation."
        }
        Lens::Tone => {
            "Professionalism in peer review fosters trust, transparency, and respect by \
             ensuring feedback is constructive, respectful, and focused on the research rather \
             than personal critiques, while adhering to ethical principles such as avoiding \
             conflicts of interest, maintaining confidentiality, and providing timely and \
             honest reviews."
        }
        Lens::Holistic => {
            "A balanced and authentic review provides a comprehensive assessment of a \
             manuscript by acknowledging its strengths and limitations, offering actionable \
             suggestions for improvement, and maintaining transparent, unbiased feedback that \
             is constructive, fair, and focused on the manuscript's overall contribution and \
             potential for development."
        }
        Lens::Roadmap => {
            "Impactful reviews guide authors by offering precise, practical, and inspiring \
             feedback that identifies opportunities for improvement, organizes comments \
             logically by themes or sections, and provides a clear roadmap of actionable \
             solutions to foster constructive and productive revisions."
        }
    }
}

/// The four trait definitions of a lens, used to frame feedback and passed
/// verbatim to the conflict-resolution call so the service can break ties.
pub fn trait_definitions(lens: Lens) -> &'static str {
    match lens {
        Lens::EndGoal => {
            "1. Appreciate the Journal's Mission: Ensure that the manuscript aligns with the \
             journal's goals by guiding authors to articulate how their work contributes \
             substantively to its mission.\n\
             2. Understand the Review Audience: Provide feedback that addresses the needs of \
             diverse stakeholders, including authors, associate editors, and reviewers, while \
             maintaining continuity across revision rounds.\n\
             3. Tailor the Review to Journal Expectations: Frame feedback within the journal's \
             standards for rigor, contribution, and methodology to help authors meet its \
             specific expectations.\n\
             4. Do Not Overindex on Past Papers: Encourage originality by guiding authors to \
             build on existing literature without strictly replicating approaches, fostering \
             innovation and new perspectives."
        }
        Lens::Mindset => {
            "1. Put Yourself in the Shoes of the Author: Adopt a perspective that recognizes \
             the challenges authors face, offering empathetic and actionable feedback to help \
             refine their work.\n\
             2. Be Comfortable with Imperfection: Focus on improving the manuscript to a \
             publishable standard rather than aiming for perfection, while acknowledging \
             practical constraints.\n\
             3. Be Specific and Creative: Provide detailed, actionable suggestions that guide \
             authors toward clear improvements while encouraging innovative solutions.\n\
             4. Work Toward Joint Success: Collaborate constructively with authors and other \
             reviewers to achieve shared goals of enhancing the manuscript's quality and \
             contribution."
        }
        Lens::Peruse => {
            "1. Rearticulate the Core Contribution: Summarize the manuscript's main goals and \
             contributions to demonstrate a clear understanding before offering critique.\n\
             2. Read Before Critiquing: Engage deeply with the entire manuscript to ensure \
             that feedback is well-informed and contextually relevant.\n\
             3. Engage in the World of the Paper: Immerse yourself in the manuscript's \
             context, theory, and findings to provide grounded and insightful feedback.\n\
             4. Cover the Entire Paper: Provide comprehensive feedback that addresses all \
             sections of the manuscript, ensuring coherence and consistency throughout."
        }
        Lens::Allocate => {
            "1. Prioritize Major and Minor Revisions: Focus feedback on the most critical \
             issues affecting the manuscript's contribution and rigor, distinguishing major \
             concerns from minor refinements.\n\
             2. Respect the Author's Paradigm: Provide suggestions that align with the \
             author's original framework and intent while encouraging improvements within its \
             scope.\n\
             3. Articulate Flaws Precisely and Evidentially: Clearly identify issues with \
             specific evidence and explanations to help authors understand their significance \
             and address them effectively.\n\
             4. Provide Some Stretch Goals: Suggest optional enhancements or creative \
             directions that could add value to the manuscript without imposing unrealistic \
             demands."
        }
        Lens::Tone => {
            "1. Direct Feedback to the Research, Not the Author: Focus critiques on the \
             manuscript's content, methodology, and arguments rather than personalizing \
             feedback or questioning the author's abilities.\n\
             2. Be Solution-Oriented: Frame feedback in a way that identifies problems while \
             offering practical and actionable solutions for improvement.\n\
             3. Declare Conflicts of Interest: Disclose any potential biases or relationships \
             that might affect your ability to provide an impartial and fair review.\n\
             4. Avoid Hatred and Sarcasm: Maintain a respectful, professional tone in all \
             comments to foster constructive dialogue and mutual respect."
        }
        Lens::Holistic => {
            "1. Be Candid About the Contribution: Clearly and honestly evaluate the \
             manuscript's novelty and significance, focusing on its alignment with the \
             journal's goals and its contribution to the field.\n\
             2. Acknowledge Both Strengths and Weaknesses: Highlight the paper's merits \
             alongside areas for improvement, providing a balanced view that motivates the \
             author while guiding revisions.\n\
             3. Remember That Your Feedback Is One Piece of Input: Recognize that your role \
             is to contribute constructive insights rather than making definitive decisions \
             about the manuscript's fate.\n\
             4. Frame Feedback Encouragingly: Use a positive and professional tone to frame \
             critiques as opportunities for improvement, fostering a constructive dialogue \
             with the authors."
        }
        Lens::Roadmap => {
            "1. Use a Logical Structure: Organize feedback into clearly defined sections, \
             such as summary, major issues, and minor suggestions, so authors can follow and \
             implement revisions.\n\
             2. Number Your Suggestions: Present comments as a numbered list to enhance \
             clarity, making it straightforward for authors to address each point \
             systematically.\n\
             3. Create Smooth Flow Between Sections: Connect related comments across \
             different sections of the paper to provide a cohesive narrative that helps \
             authors see the bigger picture.\n\
             4. Optimize Review Length: Keep reviews concise by focusing on critical issues \
             and avoiding exhaustive details on minor points, ensuring the feedback is \
             actionable and efficient."
        }
    }
}

/// Build the user prompt for a feedback-generation call.
pub fn build_feedback_prompt(document: &str, lens: Lens) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "We are applying the '{}' dimension of the E.M.P.A.T.H.Y. framework ({}).\n\n",
        lens.letter(),
        lens.title()
    ));
    prompt.push_str(lens_brief(lens));
    prompt.push_str("\n\nTraits of this dimension:\n");
    prompt.push_str(trait_definitions(lens));

    prompt.push_str("\n\nHere is the review document:\n");
    prompt.push_str(document);

    prompt.push_str(
        "\n\n1. Identify all sentences that can be improved under each trait, as truthfully \
         as possible. Avoid forcing classification into traits when it does not apply.\n\
         2. Generate suggested improvements for these sentences. Sentences enclosed by '<<>>' \
         already contain changes from earlier stages; make sure suggestions for those retain \
         the key aspects of the sentence.\n\
         3. Use the description of the trait to generate a comment that highlights why the \
         sentence needs improvement, strictly using the template 'The following sentence(s) \
         does not [description of trait] instead it [issue]'.\n\
         Submit the result with the submit_feedback tool.",
    );

    prompt
}

/// Build the user prompt for a conflict-resolution call. `previous` is the
/// serialized earlier response that classified some sentences under more
/// than one trait.
pub fn build_conflict_prompt(previous: &str, lens: Lens) -> String {
    format!(
        "Below is a previous feedback response. Some of the sentences have been classified \
         into multiple traits. Break the tie by reassigning each duplicated sentence to \
         exactly one trait. Keep the remaining results intact.\n\n\
         Here is relevant information about the traits:\n{}\n\n\
         Previous response:\n{}",
        trait_definitions(lens),
        previous
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_prompt_contains_document_and_traits() {
        let prompt = build_feedback_prompt("The method is weak.", Lens::Tone);
        assert!(prompt.contains("The method is weak."));
        assert!(prompt.contains("Avoid Hatred and Sarcasm"));
        assert!(prompt.contains("Tone: Avoid Toxicity, Be Professional"));
    }

    #[test]
    fn test_conflict_prompt_contains_previous_response() {
        let prompt = build_conflict_prompt("{\"improvements\":[]}", Lens::EndGoal);
        assert!(prompt.contains("exactly one trait"));
        assert!(prompt.contains("{\"improvements\":[]}"));
        assert!(prompt.contains("Appreciate the Journal's Mission"));
    }

    #[test]
    fn test_every_lens_has_four_traits() {
        for lens in Lens::ALL {
            let defs = trait_definitions(lens);
            for n in 1..=4 {
                assert!(defs.contains(&format!("{n}. ")), "{lens} missing trait {n}");
            }
        }
    }
}
