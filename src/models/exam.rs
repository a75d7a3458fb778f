// src/models/exam.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::id::ObjectId;

/// An exam document. `name` is unique within the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-form date label, e.g. "2025-06-01".
    #[serde(
        default,
        rename = "upcomingDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub upcoming_date: Option<String>,

    /// Display names of the subjects advertised for this exam.
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// The projection returned by the exam list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
}

impl From<&Exam> for ExamSummary {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id,
            name: exam.name.clone(),
        }
    }
}

/// DTO for seeding a new exam.
#[derive(Debug, Deserialize, Validate)]
pub struct NewExam {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub upcoming_date: Option<String>,
    pub subjects: Vec<String>,
}

impl NewExam {
    pub fn into_exam(self, id: ObjectId) -> Exam {
        Exam {
            id,
            name: self.name,
            description: self.description,
            upcoming_date: self.upcoming_date,
            subjects: self.subjects,
        }
    }
}
