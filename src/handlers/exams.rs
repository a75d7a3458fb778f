// src/handlers/exams.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::{AppError, EnvelopeError},
    models::{chapter::Chapter, id::ObjectId, subject::SortDirection},
    resolver::{DEFAULT_PAGE_SIZE, PageRequest, ResolveError, Resolver},
};

/// Query parameters for listing an exam's subjects.
/// Kept as raw strings so malformed numbers answer with a JSON 400.
#[derive(Debug, Default, Deserialize)]
pub struct SubjectListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Validate)]
struct PageQuery {
    #[validate(range(min = 1))]
    page: u32,
    #[validate(range(min = 1, max = 100))]
    limit: u32,
}

impl SubjectListParams {
    pub fn into_request(self) -> Result<PageRequest, AppError> {
        let page = parse_number(self.page.as_deref(), 1, "Invalid page")?;
        let limit = parse_number(self.limit.as_deref(), DEFAULT_PAGE_SIZE, "Invalid limit")?;

        let query = PageQuery { page, limit };
        if let Err(validation_errors) = query.validate() {
            return Err(AppError::BadRequest(validation_errors.to_string()));
        }

        let sort = match self.sort.as_deref() {
            None => SortDirection::Asc,
            Some(raw) => SortDirection::parse(raw)
                .ok_or_else(|| AppError::BadRequest("Invalid sort".to_string()))?,
        };

        Ok(PageRequest {
            page: query.page,
            page_size: query.limit,
            sort,
        })
    }
}

fn parse_number(raw: Option<&str>, default: u32, message: &str) -> Result<u32, AppError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(message.to_string())),
    }
}

/// Lists every exam as `{ exams: [{ _id, name }] }`.
pub async fn list_exams(State(resolver): State<Resolver>) -> Result<impl IntoResponse, AppError> {
    let exams = resolver.list_exams().await?;
    Ok(Json(serde_json::json!({ "exams": exams })))
}

/// Retrieves a single exam by identifier or by exact name.
pub async fn get_exam(
    State(resolver): State<Resolver>,
    Path(exam_token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exam = resolver.resolve_exam(&exam_token).await?;
    Ok(Json(exam))
}

/// Lists one page of an exam's subjects. The exam must be addressed by identifier.
pub async fn list_subjects(
    State(resolver): State<Resolver>,
    Path(exam_token): Path<String>,
    Query(params): Query<SubjectListParams>,
) -> Result<impl IntoResponse, AppError> {
    let exam_id = ObjectId::parse(&exam_token)
        .map_err(|_| AppError::BadRequest("Invalid examId".to_string()))?;
    let request = params.into_request()?;

    let page = resolver.list_subjects_page(&exam_id, request).await?;
    Ok(Json(page))
}

#[derive(Debug, Serialize)]
pub struct EntityRef {
    pub id: ObjectId,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ChaptersResponse {
    pub success: bool,
    pub exam: EntityRef,
    pub subject: EntityRef,
    pub chapters: Vec<Chapter>,
}

/// Lists a subject's chapters.
///
/// * Exam and subject are each addressed by identifier or by name.
/// * The subject must be attached to the exam.
pub async fn list_chapters(
    State(resolver): State<Resolver>,
    Path((exam_token, subject_token)): Path<(String, String)>,
) -> Result<impl IntoResponse, EnvelopeError> {
    let envelope = |e: AppError| e.enveloped("message").internal_message("Failed to fetch chapters");

    let exam = resolver
        .resolve_exam(&exam_token)
        .await
        .map_err(|e| match e {
            ResolveError::NotFound(_) => {
                AppError::NotFound(format!("Exam \"{}\" not found", exam_token))
            }
            other => other.into(),
        })
        .map_err(envelope)?;

    let subject = resolver
        .resolve_subject(&exam, &subject_token)
        .await
        .map_err(|e| envelope(e.into()))?;

    let chapters = resolver
        .resolve_chapters(&subject)
        .await
        .map_err(|e| envelope(e.into()))?;

    Ok(Json(ChaptersResponse {
        success: true,
        exam: EntityRef {
            id: exam.id,
            name: exam.name,
        },
        subject: EntityRef {
            id: subject.id,
            name: subject.name,
        },
        chapters,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>, sort: Option<&str>) -> SubjectListParams {
        SubjectListParams {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            sort: sort.map(str::to_string),
        }
    }

    #[test]
    fn defaults_to_first_page_of_ten_ascending() {
        let request = SubjectListParams::default().into_request().unwrap();
        assert_eq!(request, PageRequest::default());
    }

    #[test]
    fn rejects_malformed_paging() {
        assert!(params(Some("abc"), None, None).into_request().is_err());
        assert!(params(Some("0"), None, None).into_request().is_err());
        assert!(params(None, Some("0"), None).into_request().is_err());
        assert!(params(None, Some("500"), None).into_request().is_err());
        assert!(params(None, None, Some("sideways")).into_request().is_err());
    }

    #[test]
    fn accepts_explicit_values() {
        let request = params(Some("3"), Some("5"), Some("desc"))
            .into_request()
            .unwrap();
        assert_eq!(request.page, 3);
        assert_eq!(request.page_size, 5);
        assert_eq!(request.sort, SortDirection::Desc);
    }
}
