// src/models/topic.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{models::id::ObjectId, utils::slug::validate_slug};

/// A topic document. `slug` is unique within the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub slug: String,

    pub title: String,

    /// Label of the exam this topic was written for (e.g. "JEE").
    pub exam: String,

    #[serde(default)]
    pub description: Vec<DescriptionNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default)]
    pub views: i64,

    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Topic {
    /// Canonical page link, falling back to the slug route.
    pub fn page_link(&self) -> String {
        self.link
            .clone()
            .unwrap_or_else(|| format!("/topic/{}", self.slug))
    }
}

/// A node of a topic's recursive description tree.
///
/// Either a plain paragraph or a structured entry whose `details` and
/// `properties` children are themselves nodes. Order is significant everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptionNode {
    Text(String),
    Entry(DescriptionEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionEntry {
    /// Heading of the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<String>,

    /// Formula expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DescriptionNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<DescriptionNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl DescriptionNode {
    /// Depth of the deepest branch, counting this node as 1.
    pub fn depth(&self) -> usize {
        match self {
            DescriptionNode::Text(_) => 1,
            DescriptionNode::Entry(entry) => {
                1 + entry
                    .details
                    .iter()
                    .chain(entry.properties.iter())
                    .map(DescriptionNode::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

/// The shape returned by `GET /api/topic/{slugOrId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicView {
    pub id: ObjectId,
    pub name: String,
    pub description: Vec<DescriptionNode>,
    pub exam: String,
    pub views: i64,
    pub link: String,
}

impl From<Topic> for TopicView {
    fn from(topic: Topic) -> Self {
        let link = topic.page_link();
        Self {
            id: topic.id,
            name: topic.title,
            description: topic.description,
            exam: topic.exam,
            views: topic.views,
            link,
        }
    }
}

/// DTO for seeding a new topic.
#[derive(Debug, Deserialize, Validate)]
pub struct NewTopic {
    #[validate(length(min = 1, max = 120), custom(function = validate_slug))]
    pub slug: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 50))]
    pub exam: String,
    #[serde(default)]
    pub description: Vec<DescriptionNode>,
}

impl NewTopic {
    pub fn into_topic(self, id: ObjectId) -> Topic {
        let now = chrono::Utc::now();
        Topic {
            id,
            link: Some(format!("/topic/{}", self.slug)),
            slug: self.slug,
            title: self.title,
            exam: self.exam,
            description: self.description,
            views: 0,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}
