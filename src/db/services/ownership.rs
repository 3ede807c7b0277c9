//! Authorization gate shared by every service.
//!
//! Ownership of a todo list gates its tasks and their comments. Two rules
//! deviate from that: a task's assignee may change its status, and comments
//! can only be edited or deleted by their author.

use sea_orm::{ConnectionTrait, EntityTrait};

use crate::db::entities::{comment, task, todo_list};
use crate::db::services::ServiceError;

/// Loads the list and checks that `requester_id` owns it.
pub async fn ensure_list_owner<C: ConnectionTrait>(
    db: &C,
    list_id: i32,
    requester_id: &str,
) -> Result<todo_list::Model, ServiceError> {
    let list = todo_list::Entity::find_by_id(list_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::list_not_found(list_id))?;

    if list.owner_id != requester_id {
        return Err(ServiceError::Forbidden);
    }
    Ok(list)
}

/// Loads the task and checks that `requester_id` owns its parent list.
pub async fn ensure_task_list_owner<C: ConnectionTrait>(
    db: &C,
    task_id: i32,
    requester_id: &str,
) -> Result<task::Model, ServiceError> {
    let task = task::Entity::find_by_id(task_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::task_not_found(task_id))?;

    ensure_list_owner(db, task.todo_list_id, requester_id).await?;
    Ok(task)
}

/// The assignee or the owner of the parent list may change a task's status.
pub async fn ensure_can_change_status<C: ConnectionTrait>(
    db: &C,
    task: &task::Model,
    requester_id: &str,
) -> Result<(), ServiceError> {
    if task.assignee_id == requester_id {
        return Ok(());
    }
    ensure_list_owner(db, task.todo_list_id, requester_id)
        .await
        .map(|_| ())
}

/// Only the author may edit or delete a comment.
pub fn ensure_comment_author(
    comment: &comment::Model,
    requester_id: &str,
) -> Result<(), ServiceError> {
    if comment.created_by_user_id == requester_id {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}
