// Essay grading: rubric, prompt building, response normalization, and the
// top-level grading operation plus its HTTP handlers.
// All model calls go through llm_client; nothing here talks to Gemini directly.

pub mod grader;
pub mod handlers;
pub mod normalizer;
pub mod prompts;
pub mod result;
pub mod rubric;

pub use grader::Grader;
pub use result::GradingResult;
