//! Page state, form bodies and their conversions into API requests.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::enums::TaskStatus;
use crate::web::models::{CreateTaskRequest, TaskResponse, TodoListRequest, UpdateTaskRequest};

pub const INDEX_PAGE_SIZE: u64 = 5;
pub const SEARCH_PAGE_SIZE: u64 = 10;

pub const MIXED_SEARCH_MESSAGE: &str =
    "Use only one criterion at a time: Title OR Created dates OR Due dates.";

pub fn total_pages(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size.max(1)).max(1)
}

fn positive_or(value: Option<i64>, default: u64) -> u64 {
    match value {
        Some(v) if v > 0 => v as u64,
        _ => default,
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl Pager {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = total_pages(total, page_size);
        Self {
            page,
            page_size,
            total,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }
}

/// Raw query of the index page.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub selected_id: Option<i32>,
    pub task_page: Option<i64>,
    pub task_page_size: Option<i64>,
    pub a_status: Option<String>,
    pub a_order: Option<String>,
    pub a_page: Option<i64>,
    pub a_page_size: Option<i64>,
}

/// Index page state with defaults applied: the list pager, the selected list
/// with its task pager, and the assigned-to-me panel.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexState {
    pub page: u64,
    pub page_size: u64,
    pub selected_id: Option<i32>,
    pub task_page: u64,
    pub task_page_size: u64,
    pub a_status: TaskStatus,
    pub a_order: String,
    pub a_page: u64,
    pub a_page_size: u64,
}

impl From<IndexQuery> for IndexState {
    fn from(query: IndexQuery) -> Self {
        let a_order = match query.a_order.as_deref().map(str::trim) {
            Some(order) if order.eq_ignore_ascii_case("desc") => "desc",
            _ => "asc",
        };
        Self {
            page: positive_or(query.page, 1),
            page_size: positive_or(query.page_size, INDEX_PAGE_SIZE),
            selected_id: query.selected_id.filter(|id| *id > 0),
            task_page: positive_or(query.task_page, 1),
            task_page_size: positive_or(query.task_page_size, INDEX_PAGE_SIZE),
            a_status: query
                .a_status
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(TaskStatus::InProgress),
            a_order: a_order.to_string(),
            a_page: positive_or(query.a_page, 1),
            a_page_size: positive_or(query.a_page_size, INDEX_PAGE_SIZE),
        }
    }
}

impl IndexState {
    /// Query string that reproduces this state, used by forms posted from the index page.
    pub fn to_query(&self) -> String {
        let mut pairs = vec![
            format!("page={}", self.page),
            format!("pageSize={}", self.page_size),
        ];
        if let Some(id) = self.selected_id {
            pairs.push(format!("selectedId={id}"));
            pairs.push(format!("taskPage={}", self.task_page));
            pairs.push(format!("taskPageSize={}", self.task_page_size));
        }
        pairs.push(format!("aStatus={}", self.a_status));
        pairs.push(format!("aOrder={}", self.a_order));
        pairs.push(format!("aPage={}", self.a_page));
        pairs.push(format!("aPageSize={}", self.a_page_size));
        pairs.join("&")
    }
}

/// Index location to come back to after a form post. Only a query string is
/// accepted so the redirect never leaves the site.
pub fn index_location(return_to: Option<&str>) -> String {
    match return_to.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => format!("/?{}", query.trim_start_matches(['?', '/'])),
        None => "/".to_string(),
    }
}

pub fn list_location(list_id: i32) -> String {
    format!("/?selectedId={list_id}")
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl ListForm {
    pub fn validate(&self) -> Result<TodoListRequest, String> {
        let title = non_blank(&self.title).ok_or_else(|| "Title is required.".to_string())?;
        Ok(TodoListRequest {
            title,
            description: non_blank(&self.description),
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `YYYY-MM-DD` from a date input, blank for none.
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub assignee_id: String,
}

struct TaskFields {
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: Option<TaskStatus>,
}

impl TaskForm {
    pub fn from_task(task: &TaskResponse) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            status: task.status.to_string(),
            assignee_id: task.assignee_id.clone(),
        }
    }

    fn fields(&self) -> Result<TaskFields, String> {
        let title = non_blank(&self.title).ok_or_else(|| "Title is required.".to_string())?;
        let due_date = match non_blank(&self.due_date) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| "Due date must be in YYYY-MM-DD format.".to_string())?
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(|| "Due date must be in YYYY-MM-DD format.".to_string())?
                    .and_utc(),
            ),
            None => None,
        };
        let status = match non_blank(&self.status) {
            Some(raw) => Some(raw.parse::<TaskStatus>().map_err(|e| e.to_string())?),
            None => None,
        };
        Ok(TaskFields {
            title,
            description: non_blank(&self.description),
            due_date,
            status,
        })
    }

    pub fn to_create_request(&self) -> Result<CreateTaskRequest, String> {
        let fields = self.fields()?;
        Ok(CreateTaskRequest {
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            status: fields.status,
        })
    }

    pub fn to_update_request(&self) -> Result<UpdateTaskRequest, String> {
        let fields = self.fields()?;
        Ok(UpdateTaskRequest {
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            status: fields.status.unwrap_or(TaskStatus::NotStarted),
            assignee_id: non_blank(&self.assignee_id),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusForm {
    pub status: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnForm {
    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagLinkForm {
    pub tag_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    /// Trimmed text, or `None` when the form was blank.
    pub fn text(&self) -> Option<String> {
        non_blank(&self.text)
    }
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_from: Option<String>,
    #[serde(default)]
    pub created_to: Option<String>,
    #[serde(default)]
    pub due_from: Option<String>,
    #[serde(default)]
    pub due_to: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    None,
    Title,
    Created,
    Due,
    Mixed,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl SearchForm {
    pub fn mode(&self) -> SearchMode {
        let title = filled(&self.title);
        let created = filled(&self.created_from) || filled(&self.created_to);
        let due = filled(&self.due_from) || filled(&self.due_to);
        match (title, created, due) {
            (false, false, false) => SearchMode::None,
            (true, false, false) => SearchMode::Title,
            (false, true, false) => SearchMode::Created,
            (false, false, true) => SearchMode::Due,
            _ => SearchMode::Mixed,
        }
    }

    pub fn page(&self) -> u64 {
        positive_or(self.page, 1)
    }

    pub fn page_size(&self) -> u64 {
        positive_or(self.page_size, SEARCH_PAGE_SIZE)
    }

    /// Query string of the criteria alone, for pager links.
    pub fn criteria_query(&self) -> String {
        [
            ("title", &self.title),
            ("createdFrom", &self.created_from),
            ("createdTo", &self.created_to),
            ("dueFrom", &self.due_from),
            ("dueTo", &self.due_to),
        ]
        .into_iter()
        .filter(|(_, value)| filled(value))
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(|v| format!("{key}={}", urlencoding::encode(v.trim())))
        })
        .collect::<Vec<_>>()
        .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_at_least_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn pager_flags_neighbours() {
        let pager = Pager::new(2, 5, 11);
        assert_eq!(pager.total_pages, 3);
        assert!(pager.has_previous);
        assert!(pager.has_next);
        assert!(!Pager::new(3, 5, 11).has_next);
    }

    #[test]
    fn index_state_applies_defaults() {
        let state = IndexState::from(IndexQuery {
            page: Some(0),
            a_status: Some("bogus".into()),
            a_order: Some("DESC".into()),
            ..Default::default()
        });
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 5);
        assert_eq!(state.a_status, TaskStatus::InProgress);
        assert_eq!(state.a_order, "desc");
        assert_eq!(
            state.to_query(),
            "page=1&pageSize=5&aStatus=InProgress&aOrder=desc&aPage=1&aPageSize=5"
        );
    }

    #[test]
    fn index_location_stays_on_site() {
        assert_eq!(index_location(None), "/");
        assert_eq!(index_location(Some("  ")), "/");
        assert_eq!(index_location(Some("selectedId=3")), "/?selectedId=3");
        assert_eq!(index_location(Some("//evil.example")), "/?evil.example");
    }

    #[test]
    fn list_form_requires_title() {
        let form = ListForm {
            title: "  ".into(),
            description: "x".into(),
        };
        assert_eq!(form.validate().unwrap_err(), "Title is required.");

        let form = ListForm {
            title: " Chores ".into(),
            description: "".into(),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.title, "Chores");
        assert!(request.description.is_none());
    }

    #[test]
    fn task_form_parses_date_and_status() {
        let form = TaskForm {
            title: "Pay rent".into(),
            due_date: "2025-03-01".into(),
            status: "inprogress".into(),
            ..Default::default()
        };
        let request = form.to_create_request().unwrap();
        assert_eq!(
            request.due_date.unwrap().to_rfc3339(),
            "2025-03-01T00:00:00+00:00"
        );
        assert_eq!(request.status, Some(TaskStatus::InProgress));

        let bad = TaskForm {
            title: "x".into(),
            due_date: "03/01/2025".into(),
            ..Default::default()
        };
        assert!(bad.to_create_request().is_err());
    }

    #[test]
    fn update_request_keeps_assignee_only_when_given() {
        let form = TaskForm {
            title: "x".into(),
            status: "Completed".into(),
            assignee_id: " ".into(),
            ..Default::default()
        };
        let request = form.to_update_request().unwrap();
        assert_eq!(request.status, TaskStatus::Completed);
        assert!(request.assignee_id.is_none());
    }

    #[test]
    fn search_mode_detects_single_and_mixed_criteria() {
        let mut form = SearchForm::default();
        assert_eq!(form.mode(), SearchMode::None);

        form.title = Some("milk".into());
        assert_eq!(form.mode(), SearchMode::Title);

        form.due_to = Some("2025-01-01".into());
        assert_eq!(form.mode(), SearchMode::Mixed);

        form.title = Some(" ".into());
        assert_eq!(form.mode(), SearchMode::Due);
        assert_eq!(form.criteria_query(), "dueTo=2025-01-01");
    }

    #[test]
    fn search_paging_defaults() {
        let form = SearchForm {
            page: Some(-1),
            ..Default::default()
        };
        assert_eq!(form.page(), 1);
        assert_eq!(form.page_size(), 10);
    }

    #[test]
    fn comment_text_is_trimmed() {
        let form = CommentForm {
            text: "  hi  ".into(),
        };
        assert_eq!(form.text().as_deref(), Some("hi"));
        assert!(CommentForm { text: " ".into() }.text().is_none());
    }
}
