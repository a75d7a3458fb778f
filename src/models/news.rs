// src/models/news.rs

use serde::{Deserialize, Serialize};

/// One headline from an exam news feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub date: Option<String>,
    pub link: String,
}

/// Headlines grouped under the exam query that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamNews {
    pub exam: String,
    pub articles: Vec<Article>,
}
