// src/news.rs

//! Exam news headlines from an RSS search feed.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinSet;
use url::Url;

use crate::models::news::{Article, ExamNews};

/// Headlines kept per exam query.
pub const ARTICLES_PER_QUERY: usize = 10;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed is not valid RSS: {0}")]
    Parse(#[from] quick_xml::de::DeError),

    #[error("feed task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// News for every configured exam, in configuration order.
    async fn fetch_all(&self) -> Result<Vec<ExamNews>, NewsError>;
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Parses an RSS 2.0 document into at most `limit` articles.
/// Items without a title or link are skipped.
pub fn parse_feed(xml: &str, limit: usize) -> Result<Vec<Article>, NewsError> {
    let rss: Rss = quick_xml::de::from_str(xml)?;
    Ok(rss
        .channel
        .items
        .into_iter()
        .filter_map(|item| {
            Some(Article {
                title: item.title?,
                link: item.link?,
                date: item.pub_date,
            })
        })
        .take(limit)
        .collect())
}

/// Fetches one RSS search per exam query, concurrently.
#[derive(Clone)]
pub struct RssNewsSource {
    client: reqwest::Client,
    feed_url: Url,
    queries: Vec<String>,
}

impl RssNewsSource {
    pub fn new(feed_url: Url, queries: Vec<String>) -> Result<Self, NewsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            feed_url,
            queries,
        })
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.feed_url.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }

    async fn fetch_one(client: reqwest::Client, url: Url) -> Result<Vec<Article>, NewsError> {
        let body = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_feed(&body, ARTICLES_PER_QUERY)
    }
}

#[async_trait]
impl NewsSource for RssNewsSource {
    async fn fetch_all(&self) -> Result<Vec<ExamNews>, NewsError> {
        let mut tasks = JoinSet::new();
        for (index, query) in self.queries.iter().enumerate() {
            let client = self.client.clone();
            let url = self.search_url(query);
            tasks.spawn(async move { (index, Self::fetch_one(client, url).await) });
        }

        let mut slots: Vec<Option<Vec<Article>>> = vec![None; self.queries.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, articles) = joined?;
            slots[index] = Some(articles?);
        }

        Ok(self
            .queries
            .iter()
            .zip(slots)
            .map(|(exam, articles)| ExamNews {
                exam: exam.clone(),
                articles: articles.unwrap_or_default(),
            })
            .collect())
    }
}

/// A fixed set of headlines; also used when no feed is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticNewsSource {
    pub news: Vec<ExamNews>,
}

#[async_trait]
impl NewsSource for StaticNewsSource {
    async fn fetch_all(&self) -> Result<Vec<ExamNews>, NewsError> {
        Ok(self.news.clone())
    }
}
