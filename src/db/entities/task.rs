use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::TaskStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub title: String,
    /// Lowercased title that title search matches against.
    pub title_key: String,
    pub description: Option<String>,
    #[sea_orm(indexed)]
    pub created_date: ChronoDateTimeUtc,
    #[sea_orm(indexed)]
    pub due_date: Option<ChronoDateTimeUtc>,
    pub status: TaskStatus,
    #[sea_orm(indexed)]
    pub assignee_id: String,
    pub todo_list_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::todo_list::Entity",
        from = "Column::TodoListId",
        to = "super::todo_list::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    TodoList,
    #[sea_orm(has_many = "super::task_tag::Entity")]
    TaskTag,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::todo_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoList.def()
    }
}

impl Related<super::task_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskTag.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::task_tag::Relation::Tag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::task_tag::Relation::Task.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
