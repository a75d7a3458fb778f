// src/handlers/news.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    error::{AppError, EnvelopeError},
    news::NewsSource,
};

/// Latest headlines for each configured exam.
pub async fn list_news(
    State(news): State<Arc<dyn NewsSource>>,
) -> Result<impl IntoResponse, EnvelopeError> {
    let news = news.fetch_all().await.map_err(|e| {
        tracing::error!("Failed to fetch news: {}", e);
        AppError::InternalServerError(e.to_string())
            .enveloped("message")
            .internal_message("Failed to fetch news")
    })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "news": news,
    })))
}
