//! The `services` module is the only place that talks to the store.
//!
//! Every function takes an explicit connection and returns plain entity
//! models; mutations run their read-check-write sequence inside a single
//! transaction. Authorization decisions are delegated to [`ownership`] so the
//! rules live in one place.

pub mod comment_service;
pub mod error;
pub mod ownership;
pub mod tag_service;
pub mod task_service;
pub mod todo_list_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use comment_service::CommentService;
pub use error::ServiceError;
pub use tag_service::{TagService, TaskWithTags};
pub use task_service::{
    AssignedQuery, DateRange, NewTask, SortOrder, TaskSearch, TaskService, TaskSortBy, TaskUpdate,
};
pub use todo_list_service::TodoListService;

/// One page of results plus the number of matching rows before paging.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}
