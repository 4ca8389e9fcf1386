// Prompt text and request building for essay grading.
// Rubric and essay are interpolated verbatim; nothing is escaped.

use crate::grading::rubric::Rubric;

/// Essays are cut to this many characters before being embedded in the prompt.
pub const MAX_ESSAY_CHARS: usize = 5000;

/// Instruction block placed ahead of the rubric and essay.
pub const GRADING_INSTRUCTIONS: &str = "Analyze this graduate-level essay using the rubric below.
Return a JSON response with these exact keys: 'grade' (letter A-F),
'score' (number 0-100), and 'feedback' (detailed text analysis).";

/// One essay plus the rubric it is graded against. Built once, consumed once.
#[derive(Debug, Clone)]
pub struct GradingRequest<'a> {
    essay: &'a str,
    rubric: &'a Rubric,
}

impl<'a> GradingRequest<'a> {
    pub fn new(essay: &'a str, rubric: &'a Rubric) -> Self {
        Self {
            essay: truncate_essay(essay),
            rubric,
        }
    }

    /// Renders the full instruction string sent to the model.
    pub fn into_prompt(self) -> String {
        format!(
            "{GRADING_INSTRUCTIONS}\n\nRubric weights: {}\nEssay: {}",
            self.rubric, self.essay
        )
    }
}

/// Returns at most the first [`MAX_ESSAY_CHARS`] characters of `essay`,
/// never splitting a multi-byte character.
pub fn truncate_essay(essay: &str) -> &str {
    match essay.char_indices().nth(MAX_ESSAY_CHARS) {
        Some((byte_idx, _)) => &essay[..byte_idx],
        None => essay,
    }
}
