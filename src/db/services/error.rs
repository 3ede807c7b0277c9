use sea_orm::DbErr;

/// Failures surfaced by the store-facing services. Callers translate these
/// into transport responses; nothing here is retried or recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Forbidden")]
    Forbidden,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    pub fn list_not_found(list_id: i32) -> Self {
        ServiceError::NotFound(format!("Todo list {list_id}"))
    }

    pub fn task_not_found(task_id: i32) -> Self {
        ServiceError::NotFound(format!("Task {task_id}"))
    }

    pub fn tag_not_found(tag_id: i32) -> Self {
        ServiceError::NotFound(format!("Tag {tag_id}"))
    }

    pub fn comment_not_found(comment_id: i32) -> Self {
        ServiceError::NotFound(format!("Comment {comment_id}"))
    }
}
