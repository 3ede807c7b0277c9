use serde::{Deserialize, Serialize};

pub mod comment_models;
pub mod tag_models;
pub mod task_models;
pub mod todo_list_models;

pub use comment_models::*;
pub use tag_models::*;
pub use task_models::*;
pub use todo_list_models::*;

use crate::web::error::AppError;

// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Requester id
    pub exp: usize,  // Expiration time (timestamp)
}

/// Struct to hold the requester, to be passed as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
}

/// Blank or missing required text is rejected, as is text longer than `max` characters.
pub(crate) fn require_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{field} is required.")));
    }
    limit_text(field, Some(value), max)
}

pub(crate) fn limit_text(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
    match value {
        Some(v) if v.chars().count() > max => Err(AppError::InvalidInput(format!(
            "{field} must be at most {max} characters."
        ))),
        _ => Ok(()),
    }
}
