//! Task reads and writes.
//!
//! The three read paths are mutually exclusive query modes: tasks of one list
//! (owner only), tasks assigned to the caller, and a global search with
//! exactly one kind of criterion. Each returns a [`Paged`] result whose total
//! is counted before paging.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::{Expr, LikeExpr, NullOrdering};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, ModelTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use tracing::info;

use crate::db::entities::{prelude::Task, task};
use crate::db::enums::TaskStatus;
use crate::db::services::ownership::{ensure_can_change_status, ensure_list_owner, ensure_task_list_owner};
use crate::db::services::{Paged, ServiceError};
use crate::services::paging::PageRequest;

const LIKE_ESCAPE: char = '\\';

#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    /// Replaces the assignee only when present and non-blank.
    pub assignee_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSortBy {
    Name,
    #[default]
    DueDate,
}

impl TaskSortBy {
    /// `name` (any case) selects title ordering; anything else falls back to due date.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("name") => TaskSortBy::Name,
            _ => TaskSortBy::DueDate,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `desc` (any case) selects descending; anything else is ascending.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    fn order(self) -> Order {
        match self {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignedQuery {
    /// `None` means the default filter, `InProgress`.
    pub status: Option<TaskStatus>,
    pub sort_by: TaskSortBy,
    pub order: SortOrder,
}

/// Inclusive calendar-day range in UTC. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    fn lower_bound(&self) -> Option<DateTime<Utc>> {
        self.from.map(start_of_day)
    }

    /// Exclusive upper bound: midnight after the `to` day.
    fn upper_bound(&self) -> Option<DateTime<Utc>> {
        self.to
            .and_then(|day| day.checked_add_days(Days::new(1)))
            .map(start_of_day)
    }
}

fn range_condition(column: task::Column, range: &DateRange) -> Condition {
    let mut cond = Condition::all();
    if let Some(from) = range.lower_bound() {
        cond = cond.add(column.gte(from));
    }
    if let Some(to) = range.upper_bound() {
        cond = cond.add(column.lt(to));
    }
    cond
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// A search carries exactly one kind of criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSearch {
    Title(String),
    Created(DateRange),
    Due(DateRange),
}

impl TaskSearch {
    /// Builds a search from raw query values. Blank values count as absent,
    /// dates must be `YYYY-MM-DD`, and exactly one kind must be present.
    pub fn from_query(
        title: Option<&str>,
        created_from: Option<&str>,
        created_to: Option<&str>,
        due_from: Option<&str>,
        due_to: Option<&str>,
    ) -> Result<Self, ServiceError> {
        let present = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());

        let has_title = present(title);
        let has_created = present(created_from) || present(created_to);
        let has_due = present(due_from) || present(due_to);

        match [has_title, has_created, has_due].iter().filter(|k| **k).count() {
            0 => {
                return Err(ServiceError::InvalidInput(
                    "Provide exactly one of: title OR createdFrom/createdTo OR dueFrom/dueTo."
                        .to_string(),
                ));
            }
            1 => {}
            _ => {
                return Err(ServiceError::InvalidInput(
                    "Do not mix criteria. Use only one kind: title OR created dates OR due dates."
                        .to_string(),
                ));
            }
        }

        let range = |from: Option<&str>, to: Option<&str>| -> Result<DateRange, ServiceError> {
            Ok(DateRange {
                from: parse_day(from)?,
                to: parse_day(to)?,
            })
        };

        if has_title {
            Ok(TaskSearch::Title(title.unwrap_or_default().trim().to_string()))
        } else if has_created {
            range(created_from, created_to).map(TaskSearch::Created)
        } else {
            range(due_from, due_to).map(TaskSearch::Due)
        }
    }
}

fn parse_day(value: Option<&str>) -> Result<Option<NaiveDate>, ServiceError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ServiceError::InvalidInput("Dates must be in YYYY-MM-DD format.".to_string())),
    }
}

/// `%`, `_` and the escape character itself are matched literally.
fn like_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Search key stored next to each title. Folding happens here rather than in
/// SQL because SQLite's `LOWER()` only folds ASCII letters.
pub fn title_key(title: &str) -> String {
    title.chars().flat_map(char::to_lowercase).collect()
}

/// A task is overdue when its due day lies before `today` and it is not completed.
pub fn is_overdue(task: &task::Model, today: NaiveDate) -> bool {
    task.status != TaskStatus::Completed
        && task.due_date.is_some_and(|due| due.date_naive() < today)
}

async fn fetch_page(
    db: &DbConn,
    query: Select<task::Entity>,
    page: PageRequest,
) -> Result<Paged<task::Model>, ServiceError> {
    let total = query.clone().count(db).await?;
    let items = query
        .offset(page.offset())
        .limit(page.page_size)
        .all(db)
        .await?;
    Ok(Paged { items, total })
}

pub struct TaskService;

impl TaskService {
    /// Tasks of one list by due date (undated last), then title.
    pub async fn get_by_list(
        db: &DbConn,
        list_id: i32,
        requester_id: &str,
        page: PageRequest,
    ) -> Result<Paged<task::Model>, ServiceError> {
        ensure_list_owner(db, list_id, requester_id).await?;

        let query = Task::find()
            .filter(task::Column::TodoListId.eq(list_id))
            .order_by_with_nulls(task::Column::DueDate, Order::Asc, NullOrdering::Last)
            .order_by_asc(task::Column::Title);

        fetch_page(db, query, page).await
    }

    pub async fn get_assigned_to_me(
        db: &DbConn,
        user_id: &str,
        params: AssignedQuery,
        page: PageRequest,
    ) -> Result<Paged<task::Model>, ServiceError> {
        let status = params.status.unwrap_or(TaskStatus::InProgress);
        let query = Task::find()
            .filter(task::Column::AssigneeId.eq(user_id))
            .filter(task::Column::Status.eq(status));

        let order = params.order.order();
        let query = match params.sort_by {
            TaskSortBy::Name => query.order_by(task::Column::Title, order),
            TaskSortBy::DueDate => {
                // Undated tasks sort as if due at the end of time, in either direction.
                let nulls = match params.order {
                    SortOrder::Asc => NullOrdering::Last,
                    SortOrder::Desc => NullOrdering::First,
                };
                query
                    .order_by_with_nulls(task::Column::DueDate, order.clone(), nulls)
                    .order_by(task::Column::Title, order)
            }
        };

        fetch_page(db, query, page).await
    }

    /// Global search across every list. Results come back in store order.
    pub async fn search(
        db: &DbConn,
        search: &TaskSearch,
        page: PageRequest,
    ) -> Result<Paged<task::Model>, ServiceError> {
        let condition = match search {
            TaskSearch::Title(needle) => Condition::all().add(
                Expr::col(task::Column::TitleKey)
                    .like(LikeExpr::new(like_contains(&title_key(needle.trim()))).escape(LIKE_ESCAPE)),
            ),
            TaskSearch::Created(range) => range_condition(task::Column::CreatedDate, range),
            // Comparisons against a NULL due date are never true, so undated tasks drop out.
            TaskSearch::Due(range) => range_condition(task::Column::DueDate, range),
        };

        fetch_page(db, Task::find().filter(condition), page).await
    }

    pub async fn get_by_id(
        db: &DbConn,
        task_id: i32,
        requester_id: &str,
    ) -> Result<task::Model, ServiceError> {
        ensure_task_list_owner(db, task_id, requester_id).await
    }

    /// The creator becomes the assignee; status defaults to `NotStarted`.
    pub async fn create(
        db: &DbConn,
        list_id: i32,
        creator_id: &str,
        new_task: NewTask,
    ) -> Result<task::Model, ServiceError> {
        let txn = db.begin().await?;
        ensure_list_owner(&txn, list_id, creator_id).await?;

        let created = task::ActiveModel {
            title_key: Set(title_key(&new_task.title)),
            title: Set(new_task.title),
            description: Set(new_task.description),
            created_date: Set(Utc::now()),
            due_date: Set(new_task.due_date),
            status: Set(new_task.status.unwrap_or(TaskStatus::NotStarted)),
            assignee_id: Set(creator_id.to_string()),
            todo_list_id: Set(list_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(task_id = created.id, list_id, user = creator_id, "Task created.");
        Ok(created)
    }

    pub async fn update(
        db: &DbConn,
        task_id: i32,
        requester_id: &str,
        update: TaskUpdate,
    ) -> Result<task::Model, ServiceError> {
        let txn = db.begin().await?;
        let existing = ensure_task_list_owner(&txn, task_id, requester_id).await?;

        let mut active_task: task::ActiveModel = existing.into();
        active_task.title_key = Set(title_key(&update.title));
        active_task.title = Set(update.title);
        active_task.description = Set(update.description);
        active_task.due_date = Set(update.due_date);
        active_task.status = Set(update.status);
        if let Some(assignee) = update.assignee_id.filter(|a| !a.trim().is_empty()) {
            active_task.assignee_id = Set(assignee);
        }
        let updated = active_task.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }

    pub async fn delete(db: &DbConn, task_id: i32, requester_id: &str) -> Result<(), ServiceError> {
        let txn = db.begin().await?;
        let existing = ensure_task_list_owner(&txn, task_id, requester_id).await?;
        existing.delete(&txn).await?;
        txn.commit().await?;

        info!(task_id, user = requester_id, "Task deleted.");
        Ok(())
    }

    pub async fn change_status(
        db: &DbConn,
        task_id: i32,
        requester_id: &str,
        status: TaskStatus,
    ) -> Result<task::Model, ServiceError> {
        let txn = db.begin().await?;
        let existing = Task::find_by_id(task_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::task_not_found(task_id))?;
        ensure_can_change_status(&txn, &existing, requester_id).await?;

        let mut active_task: task::ActiveModel = existing.into();
        active_task.status = Set(status);
        let updated = active_task.update(&txn).await?;
        txn.commit().await?;

        info!(task_id, %status, user = requester_id, "Task status changed.");
        Ok(updated)
    }
}
