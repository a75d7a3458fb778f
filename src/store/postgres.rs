// src/store/postgres.rs

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, types::Json};

use super::{ContentStore, Database, Lookup, PageWindow, StoreError};
use crate::models::{
    chapter::{Chapter, TopicRef},
    exam::{Exam, ExamSummary},
    id::ObjectId,
    previous_year::{PaperQuestion, PreviousYearPaper},
    subject::{SortDirection, Subject},
    topic::{DescriptionNode, Topic},
};

/// PostgreSQL-backed content store.
///
/// Identifiers are stored as their 24-character hex form, reference sets as
/// `TEXT[]`, and tree-shaped content as `JSONB`. Membership is always
/// `$n = ANY(column)`.
#[derive(Clone)]
pub struct PgStore {
    db: Arc<Database>,
}

impl PgStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct ExamRow {
    id: String,
    name: String,
    description: Option<String>,
    upcoming_date: Option<String>,
    subjects: Vec<String>,
}

#[derive(FromRow)]
struct ExamSummaryRow {
    id: String,
    name: String,
}

#[derive(FromRow)]
struct SubjectRow {
    id: String,
    name: String,
    exam_ids: Vec<String>,
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    name: String,
    topics: Json<Vec<TopicRef>>,
    subject_ids: Vec<String>,
}

#[derive(FromRow)]
struct TopicRow {
    id: String,
    slug: String,
    title: String,
    exam: String,
    description: Json<Vec<DescriptionNode>>,
    link: Option<String>,
    views: i64,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(FromRow)]
struct PaperRow {
    id: String,
    exam_ids: Vec<String>,
    subject_ids: Vec<String>,
    year: i32,
    questions: Json<Vec<PaperQuestion>>,
}

fn parse_id(raw: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn parse_ids(raw: &[String]) -> Result<Vec<ObjectId>, StoreError> {
    raw.iter().map(|s| parse_id(s)).collect()
}

fn hex_ids(ids: &[ObjectId]) -> Vec<String> {
    ids.iter().map(ObjectId::to_hex).collect()
}

impl TryFrom<ExamRow> for Exam {
    type Error = StoreError;

    fn try_from(row: ExamRow) -> Result<Self, Self::Error> {
        Ok(Exam {
            id: parse_id(&row.id)?,
            name: row.name,
            description: row.description,
            upcoming_date: row.upcoming_date,
            subjects: row.subjects,
        })
    }
}

impl TryFrom<SubjectRow> for Subject {
    type Error = StoreError;

    fn try_from(row: SubjectRow) -> Result<Self, Self::Error> {
        Ok(Subject {
            id: parse_id(&row.id)?,
            name: row.name,
            exam_ids: parse_ids(&row.exam_ids)?,
        })
    }
}

impl TryFrom<ChapterRow> for Chapter {
    type Error = StoreError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(Chapter {
            id: parse_id(&row.id)?,
            name: row.name,
            topics: row.topics.0,
            subject_ids: parse_ids(&row.subject_ids)?,
        })
    }
}

impl TryFrom<TopicRow> for Topic {
    type Error = StoreError;

    fn try_from(row: TopicRow) -> Result<Self, Self::Error> {
        Ok(Topic {
            id: parse_id(&row.id)?,
            slug: row.slug,
            title: row.title,
            exam: row.exam,
            description: row.description.0,
            link: row.link,
            views: row.views,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<PaperRow> for PreviousYearPaper {
    type Error = StoreError;

    fn try_from(row: PaperRow) -> Result<Self, Self::Error> {
        Ok(PreviousYearPaper {
            id: parse_id(&row.id)?,
            exam_ids: parse_ids(&row.exam_ids)?,
            subject_ids: parse_ids(&row.subject_ids)?,
            year: row.year,
            questions: row.questions.0,
        })
    }
}

/// Maps a unique-constraint violation to `Duplicate`, anything else to `Query`.
fn insert_error(err: sqlx::Error, what: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(what.to_string())
        }
        _ => StoreError::Query(err),
    }
}

const TOPIC_COLUMNS: &str =
    "id, slug, title, exam, description, link, views, created_at, updated_at";

#[async_trait]
impl ContentStore for PgStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn list_exams(&self) -> Result<Vec<ExamSummary>, StoreError> {
        let pool = self.db.pool().await?;
        let rows = sqlx::query_as::<_, ExamSummaryRow>(
            "SELECT id, name FROM exams ORDER BY seq",
        )
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<ExamSummary, StoreError> {
                Ok(ExamSummary {
                    id: parse_id(&row.id)?,
                    name: row.name,
                })
            })
            .collect()
    }

    async fn count_exams(&self) -> Result<u64, StoreError> {
        let pool = self.db.pool().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exams")
            .fetch_one(pool)
            .await?;
        Ok(count as u64)
    }

    async fn find_exam(&self, lookup: &Lookup) -> Result<Option<Exam>, StoreError> {
        let pool = self.db.pool().await?;
        let query = match lookup {
            Lookup::Id(id) => sqlx::query_as::<_, ExamRow>(
                r#"
                SELECT id, name, description, upcoming_date, subjects
                FROM exams
                WHERE id = $1
                "#,
            )
            .bind(id.to_hex()),
            Lookup::Name(name) => sqlx::query_as::<_, ExamRow>(
                r#"
                SELECT id, name, description, upcoming_date, subjects
                FROM exams
                WHERE name = $1
                "#,
            )
            .bind(name.clone()),
        };

        query.fetch_optional(pool).await?.map(Exam::try_from).transpose()
    }

    async fn find_subject(
        &self,
        exam_id: &ObjectId,
        lookup: &Lookup,
    ) -> Result<Option<Subject>, StoreError> {
        let pool = self.db.pool().await?;
        let (sql, key) = match lookup {
            Lookup::Id(id) => (
                r#"
                SELECT id, name, exam_ids
                FROM subjects
                WHERE $1 = ANY(exam_ids) AND id = $2
                "#,
                id.to_hex(),
            ),
            Lookup::Name(name) => (
                r#"
                SELECT id, name, exam_ids
                FROM subjects
                WHERE $1 = ANY(exam_ids) AND name = $2
                ORDER BY seq
                LIMIT 1
                "#,
                name.clone(),
            ),
        };

        sqlx::query_as::<_, SubjectRow>(sql)
            .bind(exam_id.to_hex())
            .bind(key)
            .fetch_optional(pool)
            .await?
            .map(Subject::try_from)
            .transpose()
    }

    async fn list_subjects(
        &self,
        exam_id: &ObjectId,
        window: PageWindow,
        sort: SortDirection,
    ) -> Result<Vec<Subject>, StoreError> {
        let pool = self.db.pool().await?;
        let sql = match sort {
            SortDirection::Asc => {
                r#"
                SELECT id, name, exam_ids
                FROM subjects
                WHERE $1 = ANY(exam_ids)
                ORDER BY name ASC, id ASC
                OFFSET $2 LIMIT $3
                "#
            }
            SortDirection::Desc => {
                r#"
                SELECT id, name, exam_ids
                FROM subjects
                WHERE $1 = ANY(exam_ids)
                ORDER BY name DESC, id DESC
                OFFSET $2 LIMIT $3
                "#
            }
        };

        let rows = sqlx::query_as::<_, SubjectRow>(sql)
            .bind(exam_id.to_hex())
            .bind(window.offset as i64)
            .bind(i64::from(window.limit))
            .fetch_all(pool)
            .await?;

        rows.into_iter().map(Subject::try_from).collect()
    }

    async fn count_subjects(&self, exam_id: &ObjectId) -> Result<u64, StoreError> {
        let pool = self.db.pool().await?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subjects WHERE $1 = ANY(exam_ids)")
                .bind(exam_id.to_hex())
                .fetch_one(pool)
                .await?;
        Ok(count as u64)
    }

    async fn list_chapters(&self, subject_id: &ObjectId) -> Result<Vec<Chapter>, StoreError> {
        let pool = self.db.pool().await?;
        let rows = sqlx::query_as::<_, ChapterRow>(
            r#"
            SELECT id, name, topics, subject_ids
            FROM chapters
            WHERE $1 = ANY(subject_ids)
            ORDER BY seq
            "#,
        )
        .bind(subject_id.to_hex())
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(Chapter::try_from).collect()
    }

    async fn find_topic(
        &self,
        slug: &str,
        id: Option<ObjectId>,
    ) -> Result<Option<Topic>, StoreError> {
        let pool = self.db.pool().await?;
        let sql = format!(
            r#"
            SELECT {TOPIC_COLUMNS}
            FROM topics
            WHERE slug = $1 OR ($2::TEXT IS NOT NULL AND id = $2)
            ORDER BY (slug = $1) DESC
            LIMIT 1
            "#
        );

        sqlx::query_as::<_, TopicRow>(&sql)
            .bind(slug)
            .bind(id.map(|id| id.to_hex()))
            .fetch_optional(pool)
            .await?
            .map(Topic::try_from)
            .transpose()
    }

    async fn trending_topics(&self, limit: u32) -> Result<Vec<Topic>, StoreError> {
        let pool = self.db.pool().await?;
        let sql = format!(
            "SELECT {TOPIC_COLUMNS} FROM topics ORDER BY views DESC, title ASC LIMIT $1"
        );

        let rows = sqlx::query_as::<_, TopicRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(pool)
            .await?;

        rows.into_iter().map(Topic::try_from).collect()
    }

    async fn list_previous_years(
        &self,
        exam_id: &ObjectId,
        subject_id: &ObjectId,
    ) -> Result<Vec<PreviousYearPaper>, StoreError> {
        let pool = self.db.pool().await?;
        let rows = sqlx::query_as::<_, PaperRow>(
            r#"
            SELECT id, exam_ids, subject_ids, year, questions
            FROM previous_years
            WHERE $1 = ANY(exam_ids) AND $2 = ANY(subject_ids)
            ORDER BY year DESC, seq
            "#,
        )
        .bind(exam_id.to_hex())
        .bind(subject_id.to_hex())
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(PreviousYearPaper::try_from).collect()
    }

    async fn insert_exam(&self, exam: Exam) -> Result<(), StoreError> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO exams (id, name, description, upcoming_date, subjects)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(exam.id.to_hex())
        .bind(&exam.name)
        .bind(&exam.description)
        .bind(&exam.upcoming_date)
        .bind(&exam.subjects)
        .execute(pool)
        .await
        .map_err(|e| insert_error(e, &exam.name))?;
        Ok(())
    }

    async fn insert_subject(&self, subject: Subject) -> Result<(), StoreError> {
        let pool = self.db.pool().await?;
        sqlx::query("INSERT INTO subjects (id, name, exam_ids) VALUES ($1, $2, $3)")
            .bind(subject.id.to_hex())
            .bind(&subject.name)
            .bind(hex_ids(&subject.exam_ids))
            .execute(pool)
            .await
            .map_err(|e| insert_error(e, &subject.id.to_hex()))?;
        Ok(())
    }

    async fn insert_chapter(&self, chapter: Chapter) -> Result<(), StoreError> {
        let pool = self.db.pool().await?;
        sqlx::query(
            "INSERT INTO chapters (id, name, topics, subject_ids) VALUES ($1, $2, $3, $4)",
        )
        .bind(chapter.id.to_hex())
        .bind(&chapter.name)
        .bind(Json(&chapter.topics))
        .bind(hex_ids(&chapter.subject_ids))
        .execute(pool)
        .await
        .map_err(|e| insert_error(e, &chapter.id.to_hex()))?;
        Ok(())
    }

    async fn insert_topic(&self, topic: Topic) -> Result<(), StoreError> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO topics (id, slug, title, exam, description, link, views, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(topic.id.to_hex())
        .bind(&topic.slug)
        .bind(&topic.title)
        .bind(&topic.exam)
        .bind(Json(&topic.description))
        .bind(&topic.link)
        .bind(topic.views)
        .bind(topic.created_at)
        .bind(topic.updated_at)
        .execute(pool)
        .await
        .map_err(|e| insert_error(e, &topic.slug))?;
        Ok(())
    }

    async fn insert_previous_year(&self, paper: PreviousYearPaper) -> Result<(), StoreError> {
        let pool = self.db.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO previous_years (id, exam_ids, subject_ids, year, questions)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(paper.id.to_hex())
        .bind(hex_ids(&paper.exam_ids))
        .bind(hex_ids(&paper.subject_ids))
        .bind(paper.year)
        .bind(Json(&paper.questions))
        .execute(pool)
        .await
        .map_err(|e| insert_error(e, &paper.id.to_hex()))?;
        Ok(())
    }
}
