//! Grading result: what one grading operation produces.
//!
//! Callers pattern-match on [`GradingResult`]; HTTP consumers receive the
//! flat mapping produced by [`GradingResult::to_value`]:
//! `{"grade", "score", "feedback", ["warning"], ["error"]}`.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// Placeholder used for `grade` and `score` when the completion was not JSON.
pub const NOT_AVAILABLE: &str = "N/A";
pub const MALFORMED_OUTPUT_WARNING: &str = "Response was not in proper JSON format";
pub const PARSE_ERROR_PREFIX: &str = "Parsing error: ";

#[derive(Debug, Clone, PartialEq)]
pub enum GradingResult {
    /// The completion parsed as JSON. Returned as-is, with no schema check.
    Graded(Value),
    /// Degraded success: the completion was not JSON, so the cleaned text is
    /// surfaced as feedback.
    Unstructured { feedback: String },
    /// Normalization failed for a reason other than invalid JSON syntax.
    /// Message carries the `Parsing error: ` prefix.
    ParseFailed(String),
    /// The backend call failed; message is the backend error's description.
    BackendFailed(String),
}

impl GradingResult {
    /// Flattens the result into the conceptual JSON mapping.
    pub fn to_value(&self) -> Value {
        match self {
            GradingResult::Graded(value) => value.clone(),
            GradingResult::Unstructured { feedback } => json!({
                "grade": NOT_AVAILABLE,
                "score": NOT_AVAILABLE,
                "feedback": feedback,
                "warning": MALFORMED_OUTPUT_WARNING,
            }),
            GradingResult::ParseFailed(message) | GradingResult::BackendFailed(message) => {
                json!({ "error": message })
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            GradingResult::ParseFailed(_) | GradingResult::BackendFailed(_)
        )
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            GradingResult::ParseFailed(message) | GradingResult::BackendFailed(message) => {
                Some(message)
            }
            _ => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            GradingResult::Unstructured { .. } => Some(MALFORMED_OUTPUT_WARNING),
            _ => None,
        }
    }

    /// Best-effort field lookup on the flattened mapping.
    pub fn field(&self, key: &str) -> Option<Value> {
        match self {
            GradingResult::Graded(value) => value.get(key).cloned(),
            _ => self.to_value().get(key).cloned(),
        }
    }

    pub fn grade(&self) -> Option<Value> {
        self.field("grade")
    }

    pub fn score(&self) -> Option<Value> {
        self.field("score")
    }

    pub fn feedback(&self) -> Option<Value> {
        self.field("feedback")
    }
}

impl Serialize for GradingResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Human-readable report: grade, score out of 100, then feedback. Missing
/// fields fall back to `N/A`; failures print the error in place of feedback.
impl fmt::Display for GradingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grade = self.grade().map_or_else(|| NOT_AVAILABLE.to_string(), plain);
        let score = self.score().map_or_else(|| NOT_AVAILABLE.to_string(), plain);
        writeln!(f, "Grade: {grade}")?;
        writeln!(f, "Score: {score}/100")?;
        writeln!(f)?;
        writeln!(f, "Feedback:")?;

        let body = match self.feedback().or_else(|| self.field("error")) {
            Some(v @ Value::Object(_)) => {
                serde_json::to_string_pretty(&v).unwrap_or_else(|_| v.to_string())
            }
            Some(v) => plain(v),
            None => "No feedback available".to_string(),
        };
        write!(f, "{body}")
    }
}

/// Strings print without quotes; everything else as compact JSON.
fn plain(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
