// src/store/mod.rs

//! Storage seam for exam content.
//!
//! The resolver only talks to [`ContentStore`]. Two backends exist:
//! [`PgStore`] for PostgreSQL through an explicitly owned [`Database`]
//! handle, and [`MemoryStore`] for tests and database-less runs.
//!
//! Reference sets (a subject's exams, a chapter's subjects, a paper's exams
//! and subjects) are always queried with one membership test: "the given id
//! is an element of the set". Neither backend relies on array equality.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    chapter::Chapter,
    exam::{Exam, ExamSummary},
    id::ObjectId,
    previous_year::PreviousYearPaper,
    subject::{SortDirection, Subject},
    topic::Topic,
};

pub mod database;
pub mod memory;
pub mod postgres;

pub use database::Database;
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("stored document is malformed: {0}")]
    Corrupt(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),
}

/// How a path segment addresses a document: exactly one form per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(ObjectId),
    Name(String),
}

impl Lookup {
    /// Identifier form when the token parses as one, otherwise exact name.
    pub fn from_token(token: &str) -> Self {
        match ObjectId::parse(token) {
            Ok(id) => Lookup::Id(id),
            Err(_) => Lookup::Name(token.to_string()),
        }
    }
}

/// Offset/limit slice of an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u32,
}

impl PageWindow {
    /// Window for a 1-indexed page.
    pub fn for_page(page: u32, limit: u32) -> Self {
        Self {
            offset: u64::from(page.saturating_sub(1)) * u64::from(limit),
            limit,
        }
    }
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn list_exams(&self) -> Result<Vec<ExamSummary>, StoreError>;

    async fn count_exams(&self) -> Result<u64, StoreError>;

    async fn find_exam(&self, lookup: &Lookup) -> Result<Option<Exam>, StoreError>;

    /// Subject matching `lookup` whose exam set contains `exam_id`.
    async fn find_subject(
        &self,
        exam_id: &ObjectId,
        lookup: &Lookup,
    ) -> Result<Option<Subject>, StoreError>;

    async fn list_subjects(
        &self,
        exam_id: &ObjectId,
        window: PageWindow,
        sort: SortDirection,
    ) -> Result<Vec<Subject>, StoreError>;

    async fn count_subjects(&self, exam_id: &ObjectId) -> Result<u64, StoreError>;

    /// Chapters whose subject set contains `subject_id`, in insertion order.
    async fn list_chapters(&self, subject_id: &ObjectId) -> Result<Vec<Chapter>, StoreError>;

    /// Topic whose slug equals `slug` or whose id equals `id`, in one query.
    /// A slug match wins over an id match.
    async fn find_topic(
        &self,
        slug: &str,
        id: Option<ObjectId>,
    ) -> Result<Option<Topic>, StoreError>;

    async fn trending_topics(&self, limit: u32) -> Result<Vec<Topic>, StoreError>;

    async fn list_previous_years(
        &self,
        exam_id: &ObjectId,
        subject_id: &ObjectId,
    ) -> Result<Vec<PreviousYearPaper>, StoreError>;

    async fn insert_exam(&self, exam: Exam) -> Result<(), StoreError>;

    async fn insert_subject(&self, subject: Subject) -> Result<(), StoreError>;

    async fn insert_chapter(&self, chapter: Chapter) -> Result<(), StoreError>;

    async fn insert_topic(&self, topic: Topic) -> Result<(), StoreError>;

    async fn insert_previous_year(&self, paper: PreviousYearPaper) -> Result<(), StoreError>;
}
