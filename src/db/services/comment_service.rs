use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::db::entities::{comment, prelude::Comment};
use crate::db::services::ownership::{ensure_comment_author, ensure_task_list_owner};
use crate::db::services::ServiceError;

pub struct CommentService;

impl CommentService {
    /// Comments of a task, newest first. Readable by the owner of the task's list.
    pub async fn get_by_task(
        db: &DbConn,
        task_id: i32,
        requester_id: &str,
    ) -> Result<Vec<comment::Model>, ServiceError> {
        ensure_task_list_owner(db, task_id, requester_id).await?;

        Ok(Comment::find()
            .filter(comment::Column::TaskId.eq(task_id))
            .order_by_desc(comment::Column::CreatedUtc)
            .order_by_desc(comment::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn create(
        db: &DbConn,
        task_id: i32,
        requester_id: &str,
        text: String,
    ) -> Result<comment::Model, ServiceError> {
        let txn = db.begin().await?;
        ensure_task_list_owner(&txn, task_id, requester_id).await?;

        let created = comment::ActiveModel {
            task_id: Set(task_id),
            text: Set(text),
            created_by_user_id: Set(requester_id.to_string()),
            created_utc: Set(Utc::now()),
            updated_utc: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(comment_id = created.id, task_id, user = requester_id, "Comment created.");
        Ok(created)
    }

    pub async fn update(
        db: &DbConn,
        task_id: i32,
        comment_id: i32,
        requester_id: &str,
        text: String,
    ) -> Result<comment::Model, ServiceError> {
        let txn = db.begin().await?;
        let existing = Self::find_on_task(&txn, task_id, comment_id).await?;
        ensure_comment_author(&existing, requester_id)?;

        let mut active_comment: comment::ActiveModel = existing.into();
        active_comment.text = Set(text);
        active_comment.updated_utc = Set(Some(Utc::now()));
        let updated = active_comment.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }

    pub async fn delete(
        db: &DbConn,
        task_id: i32,
        comment_id: i32,
        requester_id: &str,
    ) -> Result<(), ServiceError> {
        let txn = db.begin().await?;
        let existing = Self::find_on_task(&txn, task_id, comment_id).await?;
        ensure_comment_author(&existing, requester_id)?;
        existing.delete(&txn).await?;
        txn.commit().await?;

        info!(comment_id, task_id, user = requester_id, "Comment deleted.");
        Ok(())
    }

    /// A comment addressed through the wrong task does not exist.
    async fn find_on_task<C: ConnectionTrait>(
        db: &C,
        task_id: i32,
        comment_id: i32,
    ) -> Result<comment::Model, ServiceError> {
        Comment::find_by_id(comment_id)
            .filter(comment::Column::TaskId.eq(task_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::comment_not_found(comment_id))
    }
}
