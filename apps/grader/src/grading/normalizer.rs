//! Response Normalizer: turns raw completion text into a [`GradingResult`].
//!
//! Models like to wrap JSON in markdown fences or ignore the JSON instruction
//! entirely. Fence markers are removed wherever they appear, then the text is
//! parsed. Text that is not JSON is kept as degraded feedback rather than
//! discarded.

use serde::Deserialize;
use serde_json::{error::Category, Value};
use tracing::warn;

use crate::grading::result::{GradingResult, PARSE_ERROR_PREFIX};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Trims, removes every fence marker regardless of position, trims again.
/// Idempotent.
pub fn strip_fence_markers(text: &str) -> String {
    text.trim()
        .replace(JSON_FENCE, "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}

/// Normalizes a raw completion into a grading result.
pub fn normalize_response(raw: &str) -> GradingResult {
    let cleaned = strip_fence_markers(raw);

    match parse_value(&cleaned) {
        Ok(value) => GradingResult::Graded(value),
        Err(e) => classify_parse_error(cleaned, &e),
    }
}

/// Parses any valid JSON document. Nesting depth is unbounded (the stack
/// grows on demand) and numbers keep their source text.
fn parse_value(text: &str) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Syntax and truncation errors mean the model answered in prose: keep the
/// text as feedback. Anything else is reported as a parsing failure.
fn classify_parse_error(cleaned: String, err: &serde_json::Error) -> GradingResult {
    match err.classify() {
        Category::Syntax | Category::Eof => {
            warn!("Completion was not valid JSON ({err}); returning raw text as feedback");
            GradingResult::Unstructured { feedback: cleaned }
        }
        Category::Data | Category::Io => {
            warn!("Unexpected error while parsing completion: {err}");
            GradingResult::ParseFailed(format!("{PARSE_ERROR_PREFIX}{err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_well_formed_json_returned_unchanged() {
        let result = normalize_response(r#"{"grade":"A","score":95,"feedback":"Great work"}"#);
        assert_eq!(
            result,
            GradingResult::Graded(json!({"grade": "A", "score": 95, "feedback": "Great work"}))
        );
    }

    #[test]
    fn test_fenced_json_unwrapped() {
        let raw = "\n\n  ```json\n{\"grade\":\"A\",\"score\":95,\"feedback\":\"Great work\"}\n```  \n";
        assert_eq!(
            normalize_response(raw),
            GradingResult::Graded(json!({"grade": "A", "score": 95, "feedback": "Great work"}))
        );
    }

    #[test]
    fn test_plain_fence_without_language_tag() {
        let raw = "```\n{\"grade\":\"C\"}\n```";
        assert_eq!(
            normalize_response(raw),
            GradingResult::Graded(json!({"grade": "C"}))
        );
    }

    #[test]
    fn test_prose_becomes_unstructured_feedback() {
        let result = normalize_response("This essay is excellent but lacks citations.");
        assert_eq!(
            result.to_value(),
            json!({
                "grade": "N/A",
                "score": "N/A",
                "feedback": "This essay is excellent but lacks citations.",
                "warning": "Response was not in proper JSON format"
            })
        );
    }

    #[test]
    fn test_unstructured_feedback_is_cleaned_text() {
        let result = normalize_response("  ```json\nGrade: B, decent work\n```  ");
        assert_eq!(
            result,
            GradingResult::Unstructured {
                feedback: "Grade: B, decent work".to_string()
            }
        );
    }

    #[test]
    fn test_empty_completion_is_unstructured_with_empty_feedback() {
        assert_eq!(
            normalize_response("   "),
            GradingResult::Unstructured {
                feedback: String::new()
            }
        );
    }

    #[test]
    fn test_truncated_json_is_unstructured() {
        let result = normalize_response(r#"{"grade": "B", "score": 8"#);
        assert!(matches!(result, GradingResult::Unstructured { .. }));
    }

    #[test]
    fn test_valid_json_missing_keys_is_not_validated() {
        assert_eq!(
            normalize_response(r#"{"verdict": "pass", "score": "ninety"}"#),
            GradingResult::Graded(json!({"verdict": "pass", "score": "ninety"}))
        );
    }

    #[test]
    fn test_non_object_json_is_returned_as_is() {
        assert_eq!(
            normalize_response("[1, 2, 3]"),
            GradingResult::Graded(json!([1, 2, 3]))
        );
    }

    #[test]
    fn test_deeply_nested_json_is_graded() {
        let raw = format!("{}{}", "[".repeat(200), "]".repeat(200));
        let result = normalize_response(&raw);
        assert!(matches!(result, GradingResult::Graded(Value::Array(_))));
        assert_eq!(result.to_value().to_string(), raw);
    }

    #[test]
    fn test_deeply_nested_object_inside_fences() {
        let inner = format!("{}1{}", "{\"a\":".repeat(300), "}".repeat(300));
        let raw = format!("```json\n{{\"grade\":\"A\",\"feedback\":{inner}}}\n```");
        let result = normalize_response(&raw);
        assert_eq!(result.grade(), Some(json!("A")));
        assert!(result.feedback().unwrap().is_object());
    }

    #[test]
    fn test_big_integer_score_kept_exactly() {
        let result = normalize_response(r#"{"score": 123456789012345678901234567890}"#);
        assert!(matches!(result, GradingResult::Graded(_)));
        assert_eq!(
            result.score().unwrap().to_string(),
            "123456789012345678901234567890"
        );
    }

    #[test]
    fn test_exponent_overflow_score_is_graded() {
        let result = normalize_response(r#"{"grade": "B", "score": 1e400}"#);
        assert_eq!(result.grade(), Some(json!("B")));
        let score = result.score().unwrap();
        assert!(score.is_number());
        assert_eq!(score.to_string(), "1e+400");
    }

    #[test]
    fn test_trailing_text_after_json_is_unstructured() {
        let result = normalize_response(r#"{"grade": "A"} Hope this helps!"#);
        assert!(matches!(result, GradingResult::Unstructured { .. }));
    }

    #[test]
    fn test_fence_markers_removed_mid_string() {
        let cleaned = strip_fence_markers("prefix ```json {\"a\":1} ``` suffix");
        assert!(!cleaned.contains("```"));
        assert_eq!(cleaned, "prefix  {\"a\":1}  suffix");
    }

    #[test]
    fn test_fence_removal_is_idempotent() {
        let once = strip_fence_markers("  ```json\n{\"a\":1}\n```\n```json [] ``` ");
        assert_eq!(strip_fence_markers(&once), once);
    }

    #[test]
    fn test_multiple_fenced_blocks_are_concatenated() {
        let raw = "```json\n{\"grade\":\"A\"}\n```\nand\n```json\n{\"grade\":\"B\"}\n```";
        let result = normalize_response(raw);
        assert_eq!(
            result,
            GradingResult::Unstructured {
                feedback: "{\"grade\":\"A\"}\n\nand\n\n{\"grade\":\"B\"}".to_string()
            }
        );
    }

    #[test]
    fn test_non_syntax_error_reported_with_prefix() {
        let data_err = serde_json::from_value::<u8>(json!("not a number")).unwrap_err();
        let result = classify_parse_error("irrelevant".to_string(), &data_err);
        match result {
            GradingResult::ParseFailed(message) => {
                assert!(message.starts_with("Parsing error: "));
                assert!(message.len() > PARSE_ERROR_PREFIX.len());
            }
            other => panic!("expected ParseFailed, got {other:?}"),
        }
    }
}
