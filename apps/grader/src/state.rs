use crate::grading::Grader;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Wraps the completion backend as `Arc<dyn CompletionBackend>`.
    pub grader: Grader,
}
