use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, ModelTrait, Order, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::db::entities::prelude::{Tag, Task, TaskTag};
use crate::db::entities::{tag, task, task_tag};
use crate::db::services::ServiceError;
use crate::services::tag_color::derive_color;

/// A task together with every tag linked to it, tags ordered by name.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskWithTags {
    pub task: task::Model,
    pub tags: Vec<tag::Model>,
}

pub struct TagService;

impl TagService {
    /// Creates a tag from a trimmed, non-empty name. The colour is derived from
    /// the name and never changes afterwards.
    pub async fn create_tag(db: &DbConn, name: &str) -> Result<tag::Model, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidInput("Tag name is required".to_string()));
        }

        let new_tag = tag::ActiveModel {
            name: Set(name.to_string()),
            color_hex: Set(derive_color(name)),
            created_utc: Set(Utc::now()),
            ..Default::default()
        };
        let created = new_tag.insert(db).await?;

        info!(tag_id = created.id, name = %created.name, color = %created.color_hex, "Tag created.");
        Ok(created)
    }

    pub async fn list_tags(db: &DbConn) -> Result<Vec<tag::Model>, ServiceError> {
        Ok(Tag::find()
            .order_by_asc(tag::Column::Name)
            .order_by_asc(tag::Column::Id)
            .all(db)
            .await?)
    }

    /// Links disappear with the tag through the foreign-key cascade.
    pub async fn delete_tag(db: &DbConn, tag_id: i32) -> Result<(), ServiceError> {
        let txn = db.begin().await?;
        let existing = Tag::find_by_id(tag_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::tag_not_found(tag_id))?;
        existing.delete(&txn).await?;
        txn.commit().await?;

        info!(tag_id, "Tag deleted.");
        Ok(())
    }

    /// Links a tag to a task. Linking an already linked pair is a no-op.
    pub async fn link(db: &DbConn, task_id: i32, tag_id: i32) -> Result<(), ServiceError> {
        let txn = db.begin().await?;
        Self::ensure_pair_exists(&txn, task_id, tag_id).await?;

        let existing = TaskTag::find_by_id((task_id, tag_id)).one(&txn).await?;
        if existing.is_none() {
            task_tag::ActiveModel {
                task_id: Set(task_id),
                tag_id: Set(tag_id),
                linked_utc: Set(Utc::now()),
            }
            .insert(&txn)
            .await?;
            info!(task_id, tag_id, "Tag linked to task.");
        }
        txn.commit().await?;
        Ok(())
    }

    pub async fn unlink(db: &DbConn, task_id: i32, tag_id: i32) -> Result<(), ServiceError> {
        let txn = db.begin().await?;
        Self::ensure_pair_exists(&txn, task_id, tag_id).await?;

        let link = TaskTag::find_by_id((task_id, tag_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Link between task {task_id} and tag {tag_id}"))
            })?;
        link.delete(&txn).await?;
        txn.commit().await?;

        info!(task_id, tag_id, "Tag unlinked from task.");
        Ok(())
    }

    pub async fn tags_for_task(db: &DbConn, task_id: i32) -> Result<Vec<tag::Model>, ServiceError> {
        Task::find_by_id(task_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::task_not_found(task_id))?;

        Ok(Tag::find()
            .inner_join(TaskTag)
            .filter(task_tag::Column::TaskId.eq(task_id))
            .order_by_asc(tag::Column::Name)
            .order_by_asc(tag::Column::Id)
            .all(db)
            .await?)
    }

    /// Tasks carrying the tag, earliest due (or created, when undated) first.
    pub async fn tasks_for_tag(db: &DbConn, tag_id: i32) -> Result<Vec<TaskWithTags>, ServiceError> {
        Tag::find_by_id(tag_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::tag_not_found(tag_id))?;

        let effective_date: SimpleExpr = Func::coalesce([
            Expr::col((task::Entity, task::Column::DueDate)).into(),
            Expr::col((task::Entity, task::Column::CreatedDate)).into(),
        ])
        .into();

        let tasks = Task::find()
            .inner_join(TaskTag)
            .filter(task_tag::Column::TagId.eq(tag_id))
            .order_by(effective_date, Order::Asc)
            .order_by_asc(task::Column::Id)
            .all(db)
            .await?;

        let task_ids: Vec<i32> = tasks.iter().map(|t| t.id).collect();
        let links = TaskTag::find()
            .filter(task_tag::Column::TaskId.is_in(task_ids))
            .find_also_related(Tag)
            .all(db)
            .await?;

        let mut tags_by_task: HashMap<i32, Vec<tag::Model>> = HashMap::new();
        for (link, tag) in links {
            if let Some(tag) = tag {
                tags_by_task.entry(link.task_id).or_default().push(tag);
            }
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let mut tags = tags_by_task.remove(&task.id).unwrap_or_default();
                tags.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
                TaskWithTags { task, tags }
            })
            .collect())
    }

    async fn ensure_pair_exists<C: sea_orm::ConnectionTrait>(
        db: &C,
        task_id: i32,
        tag_id: i32,
    ) -> Result<(), ServiceError> {
        Task::find_by_id(task_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::task_not_found(task_id))?;
        Tag::find_by_id(tag_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::tag_not_found(tag_id))?;
        Ok(())
    }
}
