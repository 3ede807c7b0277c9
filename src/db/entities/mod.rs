//! SeaORM entities for the todo store.
//!
//! Each table lives in its own module; the prelude re-exports the usual
//! `Entity`/`Model`/`ActiveModel`/`Column` quartet under table-specific names.

pub mod comment;
pub mod tag;
pub mod task;
pub mod task_tag;
pub mod todo_list;

pub mod prelude {
    pub use super::todo_list::ActiveModel as TodoListActiveModel;
    pub use super::todo_list::Column as TodoListColumn;
    pub use super::todo_list::Entity as TodoList;
    pub use super::todo_list::Model as TodoListModel;

    pub use super::task::ActiveModel as TaskActiveModel;
    pub use super::task::Column as TaskColumn;
    pub use super::task::Entity as Task;
    pub use super::task::Model as TaskModel;

    pub use super::tag::ActiveModel as TagActiveModel;
    pub use super::tag::Column as TagColumn;
    pub use super::tag::Entity as Tag;
    pub use super::tag::Model as TagModel;

    pub use super::task_tag::ActiveModel as TaskTagActiveModel;
    pub use super::task_tag::Column as TaskTagColumn;
    pub use super::task_tag::Entity as TaskTag;
    pub use super::task_tag::Model as TaskTagModel;

    pub use super::comment::ActiveModel as CommentActiveModel;
    pub use super::comment::Column as CommentColumn;
    pub use super::comment::Entity as Comment;
    pub use super::comment::Model as CommentModel;
}
