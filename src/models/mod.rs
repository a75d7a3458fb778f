// src/models/mod.rs

pub mod chapter;
pub mod exam;
pub mod id;
pub mod news;
pub mod previous_year;
pub mod subject;
pub mod topic;
