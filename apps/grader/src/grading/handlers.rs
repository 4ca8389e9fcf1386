use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::grading::GradingResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub essay: String,
}

fn extract_essay(payload: Result<Json<GradeRequest>, JsonRejection>) -> Result<String, AppError> {
    payload
        .map(|Json(req)| req.essay)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// POST /api/v1/grade
/// Always 200 once the body is valid; failures are reported inside the result.
pub async fn handle_grade(
    State(state): State<AppState>,
    payload: Result<Json<GradeRequest>, JsonRejection>,
) -> Result<Json<GradingResult>, AppError> {
    let essay = extract_essay(payload)?;
    info!("Grading essay ({} chars)", essay.chars().count());
    let result = state.grader.generate_feedback(&essay).await;
    info!("Grading request completed (failed: {})", result.is_failure());
    Ok(Json(result))
}

/// POST /api/v1/grade/report
/// Same as `handle_grade`, rendered as a plain-text report.
pub async fn handle_grade_report(
    State(state): State<AppState>,
    payload: Result<Json<GradeRequest>, JsonRejection>,
) -> Result<String, AppError> {
    let essay = extract_essay(payload)?;
    Ok(state.grader.generate_feedback(&essay).await.to_string())
}
