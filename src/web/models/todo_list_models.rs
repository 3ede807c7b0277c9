use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::entities::todo_list;
use crate::web::error::AppError;
use crate::web::models::{limit_text, require_text};

pub const LIST_TITLE_MAX: usize = 100;
pub const LIST_DESCRIPTION_MAX: usize = 1000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoListResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: Option<DateTime<Utc>>,
}

impl From<todo_list::Model> for TodoListResponse {
    fn from(model: todo_list::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            owner_id: model.owner_id,
            created_utc: model.created_utc,
            updated_utc: model.updated_utc,
        }
    }
}

/// Body for both creating and updating a list.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TodoListRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TodoListRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("Title", &self.title, LIST_TITLE_MAX)?;
        limit_text("Description", self.description.as_deref(), LIST_DESCRIPTION_MAX)
    }
}
