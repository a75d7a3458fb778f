// src/store/memory.rs

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ContentStore, Lookup, PageWindow, StoreError};
use crate::models::{
    chapter::Chapter,
    exam::{Exam, ExamSummary},
    id::ObjectId,
    previous_year::PreviousYearPaper,
    subject::{SortDirection, Subject},
    topic::Topic,
};

/// In-memory content store with the same query semantics as [`super::PgStore`].
///
/// Vectors keep insertion order, which stands in for the `seq` column.
#[derive(Default)]
pub struct MemoryStore {
    exams: RwLock<Vec<Exam>>,
    subjects: RwLock<Vec<Subject>>,
    chapters: RwLock<Vec<Chapter>>,
    topics: RwLock<Vec<Topic>>,
    papers: RwLock<Vec<PreviousYearPaper>>,
    /// Number of read queries served; lets tests observe fetch traffic.
    pub read_calls: AtomicU64,
    /// When set, every call fails with `StoreError::Unavailable`.
    pub unavailable: AtomicBool,
    /// Artificial latency added to every read.
    pub read_delay: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable
            .store(unavailable, std::sync::atomic::Ordering::SeqCst);
    }

    async fn before_read(&self) -> Result<(), StoreError> {
        self.read_calls
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.check_available()?;
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store marked unavailable".into()));
        }
        Ok(())
    }
}

fn matches(lookup: &Lookup, id: &ObjectId, name: &str) -> bool {
    match lookup {
        Lookup::Id(wanted) => wanted == id,
        Lookup::Name(wanted) => wanted == name,
    }
}

fn by_name(a: &Subject, b: &Subject) -> Ordering {
    a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl ContentStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn list_exams(&self) -> Result<Vec<ExamSummary>, StoreError> {
        self.before_read().await?;
        Ok(self.exams.read().await.iter().map(ExamSummary::from).collect())
    }

    async fn count_exams(&self) -> Result<u64, StoreError> {
        self.before_read().await?;
        Ok(self.exams.read().await.len() as u64)
    }

    async fn find_exam(&self, lookup: &Lookup) -> Result<Option<Exam>, StoreError> {
        self.before_read().await?;
        Ok(self
            .exams
            .read()
            .await
            .iter()
            .find(|e| matches(lookup, &e.id, &e.name))
            .cloned())
    }

    async fn find_subject(
        &self,
        exam_id: &ObjectId,
        lookup: &Lookup,
    ) -> Result<Option<Subject>, StoreError> {
        self.before_read().await?;
        Ok(self
            .subjects
            .read()
            .await
            .iter()
            .find(|s| s.belongs_to(exam_id) && matches(lookup, &s.id, &s.name))
            .cloned())
    }

    async fn list_subjects(
        &self,
        exam_id: &ObjectId,
        window: PageWindow,
        sort: SortDirection,
    ) -> Result<Vec<Subject>, StoreError> {
        self.before_read().await?;
        let mut members: Vec<Subject> = self
            .subjects
            .read()
            .await
            .iter()
            .filter(|s| s.belongs_to(exam_id))
            .cloned()
            .collect();

        match sort {
            SortDirection::Asc => members.sort_by(by_name),
            SortDirection::Desc => members.sort_by(|a, b| by_name(b, a)),
        }

        Ok(members
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect())
    }

    async fn count_subjects(&self, exam_id: &ObjectId) -> Result<u64, StoreError> {
        self.before_read().await?;
        Ok(self
            .subjects
            .read()
            .await
            .iter()
            .filter(|s| s.belongs_to(exam_id))
            .count() as u64)
    }

    async fn list_chapters(&self, subject_id: &ObjectId) -> Result<Vec<Chapter>, StoreError> {
        self.before_read().await?;
        Ok(self
            .chapters
            .read()
            .await
            .iter()
            .filter(|c| c.subject_ids.contains(subject_id))
            .cloned()
            .collect())
    }

    async fn find_topic(
        &self,
        slug: &str,
        id: Option<ObjectId>,
    ) -> Result<Option<Topic>, StoreError> {
        self.before_read().await?;
        let topics = self.topics.read().await;
        let by_slug = topics.iter().find(|t| t.slug == slug);
        let by_id = || id.and_then(|id| topics.iter().find(|t| t.id == id));
        Ok(by_slug.or_else(by_id).cloned())
    }

    async fn trending_topics(&self, limit: u32) -> Result<Vec<Topic>, StoreError> {
        self.before_read().await?;
        let mut topics = self.topics.read().await.clone();
        topics.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.title.cmp(&b.title)));
        topics.truncate(limit as usize);
        Ok(topics)
    }

    async fn list_previous_years(
        &self,
        exam_id: &ObjectId,
        subject_id: &ObjectId,
    ) -> Result<Vec<PreviousYearPaper>, StoreError> {
        self.before_read().await?;
        let mut papers: Vec<PreviousYearPaper> = self
            .papers
            .read()
            .await
            .iter()
            .filter(|p| p.exam_ids.contains(exam_id) && p.subject_ids.contains(subject_id))
            .cloned()
            .collect();
        // Stable sort keeps insertion order within a year.
        papers.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(papers)
    }

    async fn insert_exam(&self, exam: Exam) -> Result<(), StoreError> {
        self.check_available()?;
        let mut exams = self.exams.write().await;
        if exams.iter().any(|e| e.name == exam.name || e.id == exam.id) {
            return Err(StoreError::Duplicate(exam.name));
        }
        exams.push(exam);
        Ok(())
    }

    async fn insert_subject(&self, subject: Subject) -> Result<(), StoreError> {
        self.check_available()?;
        let mut subjects = self.subjects.write().await;
        if subjects.iter().any(|s| s.id == subject.id) {
            return Err(StoreError::Duplicate(subject.id.to_hex()));
        }
        subjects.push(subject);
        Ok(())
    }

    async fn insert_chapter(&self, chapter: Chapter) -> Result<(), StoreError> {
        self.check_available()?;
        let mut chapters = self.chapters.write().await;
        if chapters.iter().any(|c| c.id == chapter.id) {
            return Err(StoreError::Duplicate(chapter.id.to_hex()));
        }
        chapters.push(chapter);
        Ok(())
    }

    async fn insert_topic(&self, topic: Topic) -> Result<(), StoreError> {
        self.check_available()?;
        let mut topics = self.topics.write().await;
        if topics.iter().any(|t| t.slug == topic.slug || t.id == topic.id) {
            return Err(StoreError::Duplicate(topic.slug));
        }
        topics.push(topic);
        Ok(())
    }

    async fn insert_previous_year(&self, paper: PreviousYearPaper) -> Result<(), StoreError> {
        self.check_available()?;
        let mut papers = self.papers.write().await;
        if papers.iter().any(|p| p.id == paper.id) {
            return Err(StoreError::Duplicate(paper.id.to_hex()));
        }
        papers.push(paper);
        Ok(())
    }
}
