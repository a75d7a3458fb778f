// src/menu/source.rs

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::models::{
    exam::ExamSummary,
    id::ObjectId,
    subject::{SortDirection, SubjectPage},
};

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(u16),

    #[error("bad endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

/// Where the menus get their exams and subject pages from.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn list_exams(&self) -> Result<Vec<ExamSummary>, MenuError>;

    async fn list_subjects(
        &self,
        exam: &ObjectId,
        page: u32,
        limit: u32,
        sort: SortDirection,
    ) -> Result<SubjectPage, MenuError>;
}

/// The exam list has been served both bare and wrapped in `{ exams }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExamListBody {
    Wrapped { exams: Vec<ExamSummary> },
    Bare(Vec<ExamSummary>),
}

impl From<ExamListBody> for Vec<ExamSummary> {
    fn from(body: ExamListBody) -> Self {
        match body {
            ExamListBody::Wrapped { exams } => exams,
            ExamListBody::Bare(exams) => exams,
        }
    }
}

/// Talks to the content API over HTTP.
#[derive(Clone)]
pub struct HttpMenuSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpMenuSource {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// `base_url` may carry a path prefix such as `/prep/`; endpoints resolve under it.
    pub fn with_client(client: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// `path` is relative (no leading slash) so the base path is kept.
    fn endpoint(&self, path: &str) -> Result<Url, MenuError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, MenuError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MenuError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl MenuSource for HttpMenuSource {
    async fn list_exams(&self) -> Result<Vec<ExamSummary>, MenuError> {
        let url = self.endpoint("api/exams")?;
        let body: ExamListBody = self.get_json(url).await?;
        Ok(body.into())
    }

    async fn list_subjects(
        &self,
        exam: &ObjectId,
        page: u32,
        limit: u32,
        sort: SortDirection,
    ) -> Result<SubjectPage, MenuError> {
        let mut url = self.endpoint(&format!("api/exams/{}/subjects", exam))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string())
            .append_pair("sort", sort.as_str());

        tracing::debug!(%url, "Fetching subject page");
        self.get_json(url).await
    }
}
