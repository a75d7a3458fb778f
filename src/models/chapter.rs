// src/models/chapter.rs

use serde::{Deserialize, Serialize};

use crate::models::id::ObjectId;

/// A chapter, attached to subjects through its `subject_ids` membership set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    /// Ordered topic references. Older documents hold bare names,
    /// newer ones `{ name, slug }` pairs; both are accepted.
    #[serde(default)]
    pub topics: Vec<TopicRef>,

    #[serde(rename = "subjectIds", default)]
    pub subject_ids: Vec<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopicRef {
    Linked { name: String, slug: String },
    Name(String),
}

impl TopicRef {
    pub fn name(&self) -> &str {
        match self {
            TopicRef::Linked { name, .. } => name,
            TopicRef::Name(name) => name,
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            TopicRef::Linked { slug, .. } => Some(slug),
            TopicRef::Name(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_topic_reference_forms_in_order() {
        let raw = serde_json::json!({
            "_id": "64b7f0c2a1e3d4f5a6b7c8d9",
            "name": "Kinematics",
            "topics": [
                "Displacement",
                { "name": "Projectile Motion", "slug": "projectile-motion" },
                "Relative Velocity"
            ],
            "subjectIds": ["64b7f0c2a1e3d4f5a6b7c8da"]
        });

        let chapter: Chapter = serde_json::from_value(raw).unwrap();
        let names: Vec<&str> = chapter.topics.iter().map(TopicRef::name).collect();
        assert_eq!(
            names,
            vec!["Displacement", "Projectile Motion", "Relative Velocity"]
        );
        assert_eq!(chapter.topics[0].slug(), None);
        assert_eq!(chapter.topics[1].slug(), Some("projectile-motion"));
    }

    #[test]
    fn missing_topics_default_to_empty() {
        let raw = serde_json::json!({
            "_id": "64b7f0c2a1e3d4f5a6b7c8d9",
            "name": "Optics"
        });
        let chapter: Chapter = serde_json::from_value(raw).unwrap();
        assert!(chapter.topics.is_empty());
        assert!(chapter.subject_ids.is_empty());
    }
}
