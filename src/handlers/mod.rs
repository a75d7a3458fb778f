// src/handlers/mod.rs

use crate::error::AppError;

pub mod exams;
pub mod news;
pub mod pages;
pub mod previous_years;
pub mod topics;

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}
