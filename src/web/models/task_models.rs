use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::entities::task;
use crate::db::enums::TaskStatus;
use crate::db::services::task_service::is_overdue;
use crate::db::services::{NewTask, TaskUpdate, TaskWithTags};
use crate::services::paging::PagingParams;
use crate::web::error::AppError;
use crate::web::models::{TagResponse, limit_text, require_text};

pub const TASK_TITLE_MAX: usize = 150;
pub const TASK_DESCRIPTION_MAX: usize = 4000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i32,
    pub todo_list_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub assignee_id: String,
    pub is_overdue: bool,
    #[serde(default)]
    pub tags: Vec<TagResponse>,
}

impl TaskResponse {
    /// Shapes a task for the wire, deriving `isOverdue` against `today`.
    pub fn from_model(model: task::Model, today: NaiveDate) -> Self {
        let is_overdue = is_overdue(&model, today);
        Self {
            id: model.id,
            todo_list_id: model.todo_list_id,
            title: model.title,
            description: model.description,
            created_date: model.created_date,
            due_date: model.due_date,
            status: model.status,
            assignee_id: model.assignee_id,
            is_overdue,
            tags: Vec::new(),
        }
    }

    pub fn from_tagged(tagged: TaskWithTags, today: NaiveDate) -> Self {
        let mut response = Self::from_model(tagged.task, today);
        response.tags = tagged.tags.into_iter().map(TagResponse::from).collect();
        response
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl CreateTaskRequest {
    pub fn into_new_task(self) -> Result<NewTask, AppError> {
        require_text("Title", &self.title, TASK_TITLE_MAX)?;
        limit_text("Description", self.description.as_deref(), TASK_DESCRIPTION_MAX)?;
        Ok(NewTask {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status: self.status,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    #[serde(default)]
    pub assignee_id: Option<String>,
}

impl UpdateTaskRequest {
    pub fn into_update(self) -> Result<TaskUpdate, AppError> {
        require_text("Title", &self.title, TASK_TITLE_MAX)?;
        limit_text("Description", self.description.as_deref(), TASK_DESCRIPTION_MAX)?;
        Ok(TaskUpdate {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status: self.status,
            assignee_id: self.assignee_id,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub status: TaskStatus,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssignedToMeQuery {
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub title: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
    pub due_from: Option<String>,
    pub due_to: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl AssignedToMeQuery {
    pub fn paging(&self) -> PagingParams {
        PagingParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

impl SearchQuery {
    pub fn paging(&self) -> PagingParams {
        PagingParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(status: TaskStatus, due: Option<DateTime<Utc>>) -> task::Model {
        task::Model {
            id: 3,
            title: "Renew passport".into(),
            title_key: "renew passport".into(),
            description: None,
            created_date: Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
            due_date: due,
            status,
            assignee_id: "alice".into(),
            todo_list_id: 1,
        }
    }

    #[test]
    fn yesterday_is_overdue_unless_completed() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let yesterday = Some(Utc.with_ymd_and_hms(2025, 2, 9, 12, 0, 0).unwrap());

        let open = TaskResponse::from_model(sample(TaskStatus::InProgress, yesterday), today);
        assert!(open.is_overdue);

        let done = TaskResponse::from_model(sample(TaskStatus::Completed, yesterday), today);
        assert!(!done.is_overdue);
    }

    #[test]
    fn serializes_camel_case_with_status_name() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let response = TaskResponse::from_model(sample(TaskStatus::NotStarted, None), today);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["todoListId"], 1);
        assert_eq!(json["assigneeId"], "alice");
        assert_eq!(json["status"], "NotStarted");
        assert_eq!(json["isOverdue"], false);
        assert!(json["dueDate"].is_null());
        assert_eq!(json["tags"], serde_json::json!([]));
    }

    #[test]
    fn create_request_validates_title_and_description() {
        let request: CreateTaskRequest = serde_json::from_value(serde_json::json!({
            "title": "  ",
        }))
        .unwrap();
        assert!(matches!(request.into_new_task(), Err(AppError::InvalidInput(_))));

        let request: CreateTaskRequest = serde_json::from_value(serde_json::json!({
            "title": "Plan trip",
            "description": "x".repeat(TASK_DESCRIPTION_MAX + 1),
        }))
        .unwrap();
        assert!(matches!(request.into_new_task(), Err(AppError::InvalidInput(_))));

        let request: CreateTaskRequest = serde_json::from_value(serde_json::json!({
            "title": "Plan trip",
            "dueDate": "2025-03-01T00:00:00Z",
            "status": "InProgress",
        }))
        .unwrap();
        let new_task = request.into_new_task().unwrap();
        assert_eq!(new_task.status, Some(TaskStatus::InProgress));
        assert!(new_task.due_date.is_some());
    }
}
