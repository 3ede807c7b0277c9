use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::entities::tag;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub color_hex: String,
    pub created_utc: DateTime<Utc>,
}

impl From<tag::Model> for TagResponse {
    fn from(model: tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            color_hex: model.color_hex,
            created_utc: model.created_utc,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    #[serde(default)]
    pub name: String,
}
