// src/handlers/previous_years.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::{AppError, EnvelopeError},
    resolver::{ResolveError, Resolver},
};

/// Lists previous-year papers filed under both the exam and the subject.
///
/// Both path segments must be identifiers. A malformed one answers 500 with
/// the parse message, matching the behaviour clients already handle.
pub async fn list_previous_years(
    State(resolver): State<Resolver>,
    Path((exam_token, subject_token)): Path<(String, String)>,
) -> Result<impl IntoResponse, EnvelopeError> {
    let papers = resolver
        .previous_years(&exam_token, &subject_token)
        .await
        .map_err(|e| match e {
            ResolveError::InvalidInput(msg) => AppError::BadRequest(msg)
                .enveloped("error")
                .with_status(StatusCode::INTERNAL_SERVER_ERROR),
            other => AppError::from(other).enveloped("error"),
        })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": papers,
    })))
}
