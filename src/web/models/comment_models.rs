use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::entities::comment;
use crate::web::error::AppError;
use crate::web::models::require_text;

pub const COMMENT_TEXT_MAX: usize = 2000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub task_id: i32,
    pub text: String,
    pub created_by_user_id: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: Option<DateTime<Utc>>,
}

impl From<comment::Model> for CommentResponse {
    fn from(model: comment::Model) -> Self {
        Self {
            id: model.id,
            task_id: model.task_id,
            text: model.text,
            created_by_user_id: model.created_by_user_id,
            created_utc: model.created_utc,
            updated_utc: model.updated_utc,
        }
    }
}

/// Body for both creating and editing a comment.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    #[serde(default)]
    pub text: String,
}

impl CommentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("Text", &self.text, COMMENT_TEXT_MAX)
    }
}
