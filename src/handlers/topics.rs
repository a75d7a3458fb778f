// src/handlers/topics.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, models::topic::TopicView, resolver::Resolver};

/// Retrieves a topic by slug or by identifier.
pub async fn get_topic(
    State(resolver): State<Resolver>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let topic = resolver.resolve_topic(&token).await?;
    Ok(Json(TopicView::from(topic)))
}

/// The most viewed topics, most popular first.
pub async fn trending_topics(
    State(resolver): State<Resolver>,
) -> Result<impl IntoResponse, AppError> {
    let topics = resolver.trending_topics().await?;
    Ok(Json(topics))
}
