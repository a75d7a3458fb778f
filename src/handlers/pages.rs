// src/handlers/pages.rs

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    news::NewsSource,
    render,
    resolver::{PageRequest, ResolveError, Resolver},
};

/// A page that could not be built. Rendered as an inline message scoped to
/// the entity that failed, never as a bare error document.
#[derive(Debug)]
pub enum PageError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound(text) => {
                (StatusCode::NOT_FOUND, Html(render::message("Not found", &text))).into_response()
            }
            PageError::Internal(detail) => {
                tracing::error!("Page rendering failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(render::message(
                        "Something went wrong",
                        "Something went wrong. Please try again later.",
                    )),
                )
                    .into_response()
            }
        }
    }
}

/// Maps a resolver failure onto a page message; `not_found` names the entity.
fn page_error(err: ResolveError, not_found: impl FnOnce() -> String) -> PageError {
    match err {
        ResolveError::NotFound(_) | ResolveError::InvalidInput(_) => {
            PageError::NotFound(not_found())
        }
        ResolveError::Store(e) => PageError::Internal(e.to_string()),
    }
}

/// `?page=` on the exam page. Anything that is not a positive number shows
/// the first page.
#[derive(Debug, Default, Deserialize)]
pub struct ExamPageParams {
    page: Option<String>,
}

impl ExamPageParams {
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }
}

pub async fn exam_page(
    State(resolver): State<Resolver>,
    Path(exam_token): Path<String>,
    Query(params): Query<ExamPageParams>,
) -> Result<Html<String>, PageError> {
    let exam = resolver
        .resolve_exam(&exam_token)
        .await
        .map_err(|e| page_error(e, || format!("Exam \"{}\" not found", exam_token)))?;

    let subjects = resolver
        .list_subjects_page(
            &exam.id,
            PageRequest {
                page: params.page(),
                ..PageRequest::default()
            },
        )
        .await
        .map_err(|e| page_error(e, || format!("No subjects for exam \"{}\"", exam.name)))?;

    Ok(Html(render::exam_page(&exam, &subjects)))
}

pub async fn chapters_page(
    State(resolver): State<Resolver>,
    Path((exam_token, subject_token)): Path<(String, String)>,
) -> Result<Html<String>, PageError> {
    let exam = resolver
        .resolve_exam(&exam_token)
        .await
        .map_err(|e| page_error(e, || format!("Exam \"{}\" not found", exam_token)))?;

    let subject = resolver
        .resolve_subject(&exam, &subject_token)
        .await
        .map_err(|e| {
            page_error(e, || {
                format!(
                    "Subject \"{}\" not found for exam \"{}\"",
                    subject_token, exam.name
                )
            })
        })?;

    let chapters = resolver
        .resolve_chapters(&subject)
        .await
        .map_err(|e| page_error(e, || format!("No chapters for \"{}\"", subject.name)))?;

    Ok(Html(render::chapters_page(&exam, &subject, &chapters)))
}

pub async fn subject_info_page(
    State(resolver): State<Resolver>,
    Path((exam_token, subject_token)): Path<(String, String)>,
) -> Result<Html<String>, PageError> {
    let exam = resolver
        .resolve_exam(&exam_token)
        .await
        .map_err(|e| page_error(e, || format!("Exam \"{}\" not found", exam_token)))?;

    let subject = resolver
        .resolve_subject(&exam, &subject_token)
        .await
        .map_err(|e| {
            page_error(e, || {
                format!(
                    "Subject \"{}\" not found for exam \"{}\"",
                    subject_token, exam.name
                )
            })
        })?;

    let chapters = resolver
        .resolve_chapters(&subject)
        .await
        .map_err(|e| page_error(e, || format!("No chapters for \"{}\"", subject.name)))?;

    Ok(Html(render::subject_info_page(&exam, &subject, &chapters)))
}

pub async fn previous_years_page(
    State(resolver): State<Resolver>,
    Path((exam_token, subject_token)): Path<(String, String)>,
) -> Result<Html<String>, PageError> {
    let exam = resolver
        .resolve_exam(&exam_token)
        .await
        .map_err(|e| page_error(e, || format!("Exam \"{}\" not found", exam_token)))?;

    let subject = resolver
        .resolve_subject(&exam, &subject_token)
        .await
        .map_err(|e| {
            page_error(e, || {
                format!(
                    "Subject \"{}\" not found for exam \"{}\"",
                    subject_token, exam.name
                )
            })
        })?;

    let papers = resolver
        .papers_for(&exam, &subject)
        .await
        .map_err(|e| page_error(e, || format!("No papers for \"{}\"", subject.name)))?;

    Ok(Html(render::previous_years_page(&exam, &subject, &papers)))
}

pub async fn topic_page(
    State(resolver): State<Resolver>,
    Path(token): Path<String>,
) -> Result<Html<String>, PageError> {
    let topic = resolver
        .resolve_topic(&token)
        .await
        .map_err(|e| page_error(e, || format!("Topic \"{}\" not found", token)))?;

    Ok(Html(render::topic_page(&topic)))
}

pub async fn news_page(
    State(news): State<Arc<dyn NewsSource>>,
) -> Result<Html<String>, PageError> {
    let news = news
        .fetch_all()
        .await
        .map_err(|e| PageError::Internal(format!("Failed to fetch news: {}", e)))?;

    Ok(Html(render::news_page(&news)))
}
