// src/resolver.rs

//! Maps path segments to unique documents.
//!
//! Two strategies are used, deliberately kept apart:
//!
//! * Exams and subjects take exactly one path per call: if the token parses
//!   as an [`ObjectId`] it is matched by identifier only, otherwise by exact
//!   name only. A valid identifier that matches nothing is `NotFound`; the
//!   resolver never retries it as a name.
//! * Topics are matched by slug OR identifier in a single combined query,
//!   with a slug match winning if both forms hit different documents.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    models::{
        chapter::Chapter,
        exam::{Exam, ExamSummary},
        id::ObjectId,
        previous_year::PreviousYearPaper,
        subject::{SortDirection, Subject, SubjectPage, total_pages},
        topic::Topic,
    },
    store::{ContentStore, Lookup, PageWindow, StoreError},
};

/// Default number of subjects per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Number of topics in the trending list.
pub const TRENDING_LIMIT: u32 = 5;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// No document, or one that fails a scoping constraint.
    #[error("{0}")]
    NotFound(String),

    /// Malformed input where a well-formed one is required.
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A validated request for one page of an exam's subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-indexed.
    pub page: u32,
    pub page_size: u32,
    pub sort: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortDirection::Asc,
        }
    }
}

#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn ContentStore>,
}

impl Resolver {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn list_exams(&self) -> Result<Vec<ExamSummary>, ResolveError> {
        Ok(self.store.list_exams().await?)
    }

    pub async fn resolve_exam(&self, token: &str) -> Result<Exam, ResolveError> {
        if token.is_empty() {
            return Err(ResolveError::InvalidInput("Exam not provided".to_string()));
        }

        let lookup = Lookup::from_token(token);
        tracing::debug!(?lookup, "Resolving exam");

        self.store
            .find_exam(&lookup)
            .await?
            .ok_or_else(|| ResolveError::NotFound("Exam not found".to_string()))
    }

    /// Resolves a subject within an exam. A subject that exists but is not
    /// attached to `exam` is reported as not found for that exam.
    pub async fn resolve_subject(&self, exam: &Exam, token: &str) -> Result<Subject, ResolveError> {
        if token.is_empty() {
            return Err(ResolveError::InvalidInput("Subject not provided".to_string()));
        }

        let lookup = Lookup::from_token(token);
        self.store
            .find_subject(&exam.id, &lookup)
            .await?
            .ok_or_else(|| {
                ResolveError::NotFound(format!(
                    "Subject \"{}\" not found for exam \"{}\"",
                    token, exam.name
                ))
            })
    }

    /// Every chapter of a subject, in insertion order.
    pub async fn resolve_chapters(&self, subject: &Subject) -> Result<Vec<Chapter>, ResolveError> {
        Ok(self.store.list_chapters(&subject.id).await?)
    }

    pub async fn resolve_topic(&self, token: &str) -> Result<Topic, ResolveError> {
        if token.is_empty() {
            return Err(ResolveError::InvalidInput("Topic ID not provided".to_string()));
        }

        let id = ObjectId::parse(token).ok();
        self.store
            .find_topic(token, id)
            .await?
            .ok_or_else(|| ResolveError::NotFound("Topic not found".to_string()))
    }

    pub async fn trending_topics(&self) -> Result<Vec<Topic>, ResolveError> {
        Ok(self.store.trending_topics(TRENDING_LIMIT).await?)
    }

    /// One page of the subjects attached to `exam_id`. Pages past the end
    /// come back empty; they are not an error.
    pub async fn list_subjects_page(
        &self,
        exam_id: &ObjectId,
        request: PageRequest,
    ) -> Result<SubjectPage, ResolveError> {
        if request.page == 0 || request.page_size == 0 {
            return Err(ResolveError::InvalidInput("Invalid page".to_string()));
        }

        let window = PageWindow::for_page(request.page, request.page_size);
        let subjects = self
            .store
            .list_subjects(exam_id, window, request.sort)
            .await?;
        let total = self.store.count_subjects(exam_id).await?;

        Ok(SubjectPage {
            subjects,
            total,
            page: request.page,
            total_pages: total_pages(total, request.page_size),
        })
    }

    /// Papers filed under both the exam and the subject. Both tokens must be
    /// identifiers; names are not accepted here.
    pub async fn previous_years(
        &self,
        exam_token: &str,
        subject_token: &str,
    ) -> Result<Vec<PreviousYearPaper>, ResolveError> {
        let exam_id = ObjectId::parse(exam_token)
            .map_err(|e| ResolveError::InvalidInput(format!("Invalid exam identifier: {e}")))?;
        let subject_id = ObjectId::parse(subject_token)
            .map_err(|e| ResolveError::InvalidInput(format!("Invalid subject identifier: {e}")))?;

        Ok(self
            .store
            .list_previous_years(&exam_id, &subject_id)
            .await?)
    }

    /// Papers for an already resolved exam and subject.
    pub async fn papers_for(
        &self,
        exam: &Exam,
        subject: &Subject,
    ) -> Result<Vec<PreviousYearPaper>, ResolveError> {
        Ok(self
            .store
            .list_previous_years(&exam.id, &subject.id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn exam(name: &str) -> Exam {
        Exam {
            id: ObjectId::new(),
            name: name.to_string(),
            description: None,
            upcoming_date: None,
            subjects: vec![],
        }
    }

    fn subject(name: &str, exams: &[&Exam]) -> Subject {
        Subject {
            id: ObjectId::new(),
            name: name.to_string(),
            exam_ids: exams.iter().map(|e| e.id).collect(),
        }
    }

    async fn fixture() -> (Resolver, Arc<MemoryStore>, Exam, Exam) {
        let store = Arc::new(MemoryStore::new());
        let jee = exam("JEE");
        let neet = exam("NEET");
        store.insert_exam(jee.clone()).await.unwrap();
        store.insert_exam(neet.clone()).await.unwrap();
        (Resolver::new(store.clone()), store, jee, neet)
    }

    #[tokio::test]
    async fn resolves_exam_by_id_or_by_name() {
        let (resolver, _, jee, _) = fixture().await;

        let by_id = resolver.resolve_exam(&jee.id.to_hex()).await.unwrap();
        assert_eq!(by_id.id, jee.id);

        let by_name = resolver.resolve_exam("JEE").await.unwrap();
        assert_eq!(by_name.id, jee.id);

        assert!(matches!(
            resolver.resolve_exam("jee").await,
            Err(ResolveError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn valid_identifier_never_falls_back_to_name() {
        let (resolver, store, _, _) = fixture().await;

        // An exam whose *name* looks like an identifier.
        let lookalike = ObjectId::new().to_hex();
        store.insert_exam(exam(&lookalike)).await.unwrap();

        let result = resolver.resolve_exam(&lookalike).await;
        assert!(matches!(result, Err(ResolveError::NotFound(_))));
    }

    #[tokio::test]
    async fn subject_outside_exam_is_not_found_for_that_exam() {
        let (resolver, store, jee, neet) = fixture().await;
        let biology = subject("Biology", &[&neet]);
        store.insert_subject(biology.clone()).await.unwrap();

        assert_eq!(
            resolver.resolve_subject(&neet, "Biology").await.unwrap().id,
            biology.id
        );

        match resolver.resolve_subject(&jee, "Biology").await {
            Err(ResolveError::NotFound(msg)) => {
                assert_eq!(msg, "Subject \"Biology\" not found for exam \"JEE\"")
            }
            other => panic!("unexpected: {other:?}"),
        }

        let by_id = resolver.resolve_subject(&jee, &biology.id.to_hex()).await;
        assert!(matches!(by_id, Err(ResolveError::NotFound(_))));
    }

    #[tokio::test]
    async fn pages_subjects_and_reports_totals() {
        let (resolver, store, jee, _) = fixture().await;
        for i in 0..25 {
            store
                .insert_subject(subject(&format!("Subject {i:02}"), &[&jee]))
                .await
                .unwrap();
        }

        let first = resolver
            .list_subjects_page(&jee.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(first.total, 25);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.subjects.len(), 10);
        assert_eq!(first.subjects[0].name, "Subject 00");

        let third = resolver
            .list_subjects_page(&jee.id, PageRequest { page: 3, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(third.subjects.len(), 5);

        let fourth = resolver
            .list_subjects_page(&jee.id, PageRequest { page: 4, ..Default::default() })
            .await
            .unwrap();
        assert!(fourth.subjects.is_empty());
        assert_eq!(fourth.page, 4);
        assert_eq!(fourth.total_pages, 3);

        let desc = resolver
            .list_subjects_page(
                &jee.id,
                PageRequest {
                    sort: SortDirection::Desc,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(desc.subjects[0].name, "Subject 24");
    }

    #[tokio::test]
    async fn page_zero_is_invalid() {
        let (resolver, _, jee, _) = fixture().await;
        let result = resolver
            .list_subjects_page(&jee.id, PageRequest { page: 0, ..Default::default() })
            .await;
        assert!(matches!(result, Err(ResolveError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn previous_years_require_identifiers() {
        let (resolver, _, jee, _) = fixture().await;
        let result = resolver.previous_years(&jee.id.to_hex(), "Physics").await;
        match result {
            Err(ResolveError::InvalidInput(msg)) => assert!(msg.contains("Physics")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn storage_failure_surfaces_as_store_error() {
        let (resolver, store, _, _) = fixture().await;
        store.set_unavailable(true);
        assert!(matches!(
            resolver.resolve_exam("JEE").await,
            Err(ResolveError::Store(_))
        ));
    }
}
