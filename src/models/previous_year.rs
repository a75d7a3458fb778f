// src/models/previous_year.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::id::ObjectId;

/// A previous-year question paper for one or more exams and subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousYearPaper {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(rename = "examIds", default)]
    pub exam_ids: Vec<ObjectId>,

    #[serde(rename = "subjectIds", default)]
    pub subject_ids: Vec<ObjectId>,

    pub year: i32,

    /// Questions in paper order.
    #[serde(default)]
    pub questions: Vec<PaperQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PaperQuestion {
    #[validate(length(min = 1, max = 4000))]
    pub question: String,

    #[serde(default)]
    pub options: Vec<String>,

    #[validate(length(min = 1, max = 500))]
    pub answer: String,
}
