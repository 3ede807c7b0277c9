use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::db::entities::{prelude::TodoList, todo_list};
use crate::db::services::ownership::ensure_list_owner;
use crate::db::services::{Paged, ServiceError};
use crate::services::paging::PageRequest;

pub struct TodoListService;

impl TodoListService {
    /// Lists owned by `owner_id`, ordered by title.
    pub async fn get_mine(
        db: &DbConn,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Paged<todo_list::Model>, ServiceError> {
        let query = TodoList::find().filter(todo_list::Column::OwnerId.eq(owner_id));

        let total = query.clone().count(db).await?;
        let items = query
            .order_by_asc(todo_list::Column::Title)
            .order_by_asc(todo_list::Column::Id)
            .offset(page.offset())
            .limit(page.page_size)
            .all(db)
            .await?;

        Ok(Paged { items, total })
    }

    pub async fn get_by_id(
        db: &DbConn,
        list_id: i32,
        requester_id: &str,
    ) -> Result<todo_list::Model, ServiceError> {
        ensure_list_owner(db, list_id, requester_id).await
    }

    pub async fn create(
        db: &DbConn,
        owner_id: &str,
        title: String,
        description: Option<String>,
    ) -> Result<todo_list::Model, ServiceError> {
        let new_list = todo_list::ActiveModel {
            title: Set(title),
            description: Set(description),
            owner_id: Set(owner_id.to_string()),
            created_utc: Set(Utc::now()),
            updated_utc: Set(None),
            ..Default::default()
        };
        let list = new_list.insert(db).await?;

        info!(list_id = list.id, owner = owner_id, "Todo list created.");
        Ok(list)
    }

    pub async fn update(
        db: &DbConn,
        list_id: i32,
        requester_id: &str,
        title: String,
        description: Option<String>,
    ) -> Result<todo_list::Model, ServiceError> {
        let txn = db.begin().await?;
        let list = ensure_list_owner(&txn, list_id, requester_id).await?;

        let mut active_list: todo_list::ActiveModel = list.into();
        active_list.title = Set(title);
        active_list.description = Set(description);
        active_list.updated_utc = Set(Some(Utc::now()));
        let updated = active_list.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Deleting a list removes its tasks (and their comments and tag links) through the cascade.
    pub async fn delete(db: &DbConn, list_id: i32, requester_id: &str) -> Result<(), ServiceError> {
        let txn = db.begin().await?;
        let list = ensure_list_owner(&txn, list_id, requester_id).await?;
        list.delete(&txn).await?;
        txn.commit().await?;

        info!(list_id, user = requester_id, "Todo list deleted.");
        Ok(())
    }
}
