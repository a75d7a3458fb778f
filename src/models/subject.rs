// src/models/subject.rs

use serde::{Deserialize, Serialize};

use crate::models::id::ObjectId;

/// A subject, attached to exams through its `exam_ids` membership set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(rename = "examIds", default)]
    pub exam_ids: Vec<ObjectId>,
}

impl Subject {
    pub fn belongs_to(&self, exam_id: &ObjectId) -> bool {
        self.exam_ids.contains(exam_id)
    }
}

/// Ordering applied to subject names when paging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One page of an exam's subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPage {
    pub subjects: Vec<Subject>,
    pub total: u64,
    pub page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl SubjectPage {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// `ceil(total / page_size)`; zero items means zero pages.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size)) as u32
}
