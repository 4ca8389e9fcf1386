//! Grader: the top-level grading operation.
//!
//! Pipeline: build prompt → one backend call → normalize. Backend failures
//! become [`GradingResult::BackendFailed`]; nothing escapes as an error.

use std::sync::Arc;

use tracing::{info, warn};

use crate::grading::normalizer::normalize_response;
use crate::grading::prompts::GradingRequest;
use crate::grading::result::GradingResult;
use crate::grading::rubric::Rubric;
use crate::llm_client::{CompletionBackend, GenerationConfig, LlmError};

#[derive(Clone)]
pub struct Grader {
    backend: Arc<dyn CompletionBackend>,
    rubric: Rubric,
    generation: GenerationConfig,
}

impl Grader {
    /// Grader with the default rubric and generation parameters.
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            rubric: Rubric::default(),
            generation: GenerationConfig::default(),
        }
    }

    #[cfg(test)]
    pub fn with_rubric(mut self, rubric: Rubric) -> Self {
        self.rubric = rubric;
        self
    }

    #[cfg(test)]
    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Grades one essay. Always returns a result; never retries.
    pub async fn generate_feedback(&self, essay: &str) -> GradingResult {
        let prompt = GradingRequest::new(essay, &self.rubric).into_prompt();

        let completion = match self.backend.complete(&prompt, &self.generation).await {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    LlmError::Api { status, .. } => {
                        warn!("Grading call failed (status {status}): {e}")
                    }
                    _ => warn!("Grading call failed: {e}"),
                }
                return GradingResult::BackendFailed(e.to_string());
            }
        };

        let result = normalize_response(&completion);
        match (result.warning(), result.error()) {
            (Some(warning), _) => warn!("Essay graded with warning: {warning}"),
            (_, Some(error)) => warn!("Essay could not be graded: {error}"),
            _ => info!("Essay graded ({} chars)", essay.chars().count()),
        }
        result
    }
}
