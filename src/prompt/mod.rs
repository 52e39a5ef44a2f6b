//! Review prompt assembly.
//!
//! [`compose_prompt`] is a pure function: everything it embeds is passed in,
//! so the same inputs always yield the same prompt.

use strum::IntoEnumIterator;

use crate::models::{CommitInfo, DiffPresentation, EndpointEvidence, Language, ReviewSection};

/// Everything the prompt is built from.
#[derive(Debug, Clone)]
pub struct PromptInputs<'a> {
    pub current_branch: &'a str,
    pub target_branch: &'a str,
    pub commits: &'a [CommitInfo],
    pub changed_files: &'a [String],
    /// Team convention text, if a convention file was supplied.
    pub convention: Option<&'a str>,
    pub endpoints: &'a EndpointEvidence,
    pub diff: &'a DiffPresentation,
    pub language: Option<Language>,
}

/// What each section of the review should cover.
fn section_guidance(section: ReviewSection) -> &'static str {
    match section {
        ReviewSection::Changes => {
            "Summarize what changed and why, grouped by feature or module. \
             List every new or modified API endpoint with its HTTP method and path."
        }
        ReviewSection::Impact => {
            "Describe effects on callers, data, configuration and deployment. \
             Call out breaking changes and migrations."
        }
        ReviewSection::CleanCode => {
            "Point out naming, duplication, error handling and structure problems, \
             citing file paths."
        }
        ReviewSection::Performance => {
            "Flag inefficient queries, loops, allocations or blocking calls introduced by the change."
        }
        ReviewSection::Other => {
            "Anything else worth raising, using labels such as Security:, Testing:, \
             Documentation: and Suggestions: where they apply."
        }
    }
}

/// Build the review prompt sent to the AI.
pub fn compose_prompt(inputs: &PromptInputs<'_>) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "You are a senior software engineer reviewing the changes on branch `{}` \
         compared to `{}`.\n\n",
        inputs.current_branch, inputs.target_branch
    ));

    prompt.push_str("## Commits\n\n");
    if inputs.commits.is_empty() {
        prompt.push_str("(no commits)\n");
    }
    for commit in inputs.commits {
        prompt.push_str(&commit.summary_line());
        prompt.push('\n');
    }
    prompt.push('\n');

    prompt.push_str(&format!(
        "## Changed Files ({})\n\n",
        inputs.changed_files.len()
    ));
    for path in inputs.changed_files {
        prompt.push_str(path);
        prompt.push('\n');
    }
    prompt.push('\n');

    if let Some(convention) = inputs.convention.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str("## Team Conventions\n\n");
        prompt.push_str("Check the changes against these conventions:\n\n");
        prompt.push_str(convention);
        prompt.push_str("\n\n");
    }

    // The no-changes sentinel is never embedded.
    if let Some(evidence) = inputs.endpoints.evidence() {
        prompt.push_str("## Detected API Endpoints\n\n");
        prompt.push_str(
            "The following route definitions were extracted from added lines. \
             Report them exactly as written:\n\n",
        );
        prompt.push_str(evidence.trim_end());
        prompt.push_str("\n\n");
    }

    if inputs.diff.is_summarized() {
        prompt.push_str("## Diff Summary\n\n");
        prompt.push_str(
            "The diff is too large to include in full. Statistics and excerpts \
             from the first files follow.\n\n",
        );
    } else {
        prompt.push_str("## Diff\n\n");
    }
    prompt.push_str("```diff\n");
    let rendered = inputs.diff.render();
    prompt.push_str(rendered.trim_end());
    prompt.push_str("\n```\n\n");

    prompt.push_str("## Instructions\n\n");
    prompt.push_str(
        "Write the review using exactly these five numbered sections, in this order, \
         with these exact headings:\n\n",
    );
    for section in ReviewSection::iter() {
        prompt.push_str(&format!(
            "{}\n   {}\n",
            section.heading(),
            section_guidance(section)
        ));
    }
    prompt.push_str(
        "\nUse plain text with short bullet points. Do not add an introduction or a closing summary.\n",
    );

    if let Some(language) = inputs.language {
        prompt.push('\n');
        prompt.push_str(&language.translation_instruction());
        prompt.push('\n');
    }

    prompt
}
