//! Typed HTTP client for the JSON API. One method per endpoint; paged
//! endpoints return the `X-Total-Count` header alongside the items.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::db::enums::TaskStatus;
use crate::web::models::{
    ChangeStatusRequest, CommentRequest, CommentResponse, CreateTagRequest, CreateTaskRequest,
    TagResponse, TaskResponse, TodoListRequest, TodoListResponse, UpdateTaskRequest,
};

const TOTAL_COUNT_HEADER: &str = "x-total-count";

fn paging(page: u64, page_size: u64) -> [(&'static str, u64); 2] {
    [("page", page), ("pageSize", page_size)]
}

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("Request to the API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Failed to decode API response: {0}")]
    Decode(String),
}

impl ApiClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `error` field of a JSON error body, when the API sent one.
    pub fn api_message(&self) -> Option<String> {
        match self {
            ApiClientError::Status { body, .. } => serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiPage<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Missing or unparseable header counts as zero.
pub fn parse_total_count(headers: &HeaderMap) -> u64 {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Query parameters of `/api/tasks/assigned-to-me`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

/// Query parameters of `/api/tasks/search`. Blank fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_to: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl SearchFilter {
    /// Trims every criterion and drops the empty ones.
    fn without_blanks(&self) -> Self {
        Self {
            title: non_blank(&self.title),
            created_from: non_blank(&self.created_from),
            created_to: non_blank(&self.created_to),
            due_from: non_blank(&self.due_from),
            due_to: non_blank(&self.due_to),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiClientError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(%status, body = %body, "API call failed.");
        Err(ApiClientError::Status { status, body })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiClientError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiClientError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiClientError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Self::decode(response).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiPage<T>, ApiClientError> {
        let response = self.send(builder).await?;
        let total = parse_total_count(response.headers());
        let items = Self::decode(response).await?;
        Ok(ApiPage { items, total })
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiClientError> {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        Self::decode(response).await
    }

    /// Sends a request whose success carries no body.
    async fn execute<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiClientError> {
        let builder = self.request(method, path);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.send(builder).await?;
        Ok(())
    }

    // Lists

    pub async fn lists(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<ApiPage<TodoListResponse>, ApiClientError> {
        self.get_page(self.request(Method::GET, "/api/lists").query(&paging(page, page_size)))
            .await
    }

    pub async fn list(&self, list_id: i32) -> Result<TodoListResponse, ApiClientError> {
        self.get(&format!("/api/lists/{list_id}")).await
    }

    pub async fn create_list(
        &self,
        request: &TodoListRequest,
    ) -> Result<TodoListResponse, ApiClientError> {
        self.post("/api/lists", request).await
    }

    pub async fn update_list(
        &self,
        list_id: i32,
        request: &TodoListRequest,
    ) -> Result<(), ApiClientError> {
        self.execute(Method::PUT, &format!("/api/lists/{list_id}"), Some(request))
            .await
    }

    pub async fn delete_list(&self, list_id: i32) -> Result<(), ApiClientError> {
        self.execute::<()>(Method::DELETE, &format!("/api/lists/{list_id}"), None)
            .await
    }

    // Tasks

    pub async fn tasks_by_list(
        &self,
        list_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<ApiPage<TaskResponse>, ApiClientError> {
        let path = format!("/api/lists/{list_id}/tasks");
        self.get_page(self.request(Method::GET, &path).query(&paging(page, page_size)))
            .await
    }

    pub async fn task(&self, task_id: i32) -> Result<TaskResponse, ApiClientError> {
        self.get(&format!("/api/tasks/{task_id}")).await
    }

    pub async fn create_task(
        &self,
        list_id: i32,
        request: &CreateTaskRequest,
    ) -> Result<TaskResponse, ApiClientError> {
        self.post(&format!("/api/lists/{list_id}/tasks"), request)
            .await
    }

    pub async fn update_task(
        &self,
        task_id: i32,
        request: &UpdateTaskRequest,
    ) -> Result<(), ApiClientError> {
        self.execute(Method::PUT, &format!("/api/tasks/{task_id}"), Some(request))
            .await
    }

    pub async fn delete_task(&self, task_id: i32) -> Result<(), ApiClientError> {
        self.execute::<()>(Method::DELETE, &format!("/api/tasks/{task_id}"), None)
            .await
    }

    pub async fn change_status(
        &self,
        task_id: i32,
        status: TaskStatus,
    ) -> Result<(), ApiClientError> {
        self.execute(
            Method::PATCH,
            &format!("/api/tasks/{task_id}/status"),
            Some(&ChangeStatusRequest { status }),
        )
        .await
    }

    pub async fn assigned_to_me(
        &self,
        filter: &AssignedFilter,
    ) -> Result<ApiPage<TaskResponse>, ApiClientError> {
        self.get_page(self.request(Method::GET, "/api/tasks/assigned-to-me").query(filter))
            .await
    }

    pub async fn search(
        &self,
        filter: &SearchFilter,
    ) -> Result<ApiPage<TaskResponse>, ApiClientError> {
        let filter = filter.without_blanks();
        self.get_page(self.request(Method::GET, "/api/tasks/search").query(&filter))
            .await
    }

    // Tags

    pub async fn tags(&self) -> Result<Vec<TagResponse>, ApiClientError> {
        self.get("/api/tags").await
    }

    pub async fn create_tag(&self, name: &str) -> Result<TagResponse, ApiClientError> {
        let request = CreateTagRequest {
            name: name.to_string(),
        };
        self.post("/api/tags", &request).await
    }

    pub async fn delete_tag(&self, tag_id: i32) -> Result<(), ApiClientError> {
        self.execute::<()>(Method::DELETE, &format!("/api/tags/{tag_id}"), None)
            .await
    }

    pub async fn tags_for_task(&self, task_id: i32) -> Result<Vec<TagResponse>, ApiClientError> {
        self.get(&format!("/api/tasks/{task_id}/tags")).await
    }

    pub async fn tasks_for_tag(&self, tag_id: i32) -> Result<Vec<TaskResponse>, ApiClientError> {
        self.get(&format!("/api/tags/{tag_id}/tasks")).await
    }

    pub async fn link_tag(&self, task_id: i32, tag_id: i32) -> Result<(), ApiClientError> {
        self.execute::<()>(
            Method::POST,
            &format!("/api/tasks/{task_id}/tags/{tag_id}"),
            None,
        )
        .await
    }

    pub async fn unlink_tag(&self, task_id: i32, tag_id: i32) -> Result<(), ApiClientError> {
        self.execute::<()>(
            Method::DELETE,
            &format!("/api/tasks/{task_id}/tags/{tag_id}"),
            None,
        )
        .await
    }

    // Comments

    pub async fn comments(&self, task_id: i32) -> Result<Vec<CommentResponse>, ApiClientError> {
        self.get(&format!("/api/tasks/{task_id}/comments")).await
    }

    pub async fn create_comment(
        &self,
        task_id: i32,
        text: &str,
    ) -> Result<CommentResponse, ApiClientError> {
        let request = CommentRequest {
            text: text.to_string(),
        };
        self.post(&format!("/api/tasks/{task_id}/comments"), &request)
            .await
    }

    pub async fn update_comment(
        &self,
        task_id: i32,
        comment_id: i32,
        text: &str,
    ) -> Result<(), ApiClientError> {
        let request = CommentRequest {
            text: text.to_string(),
        };
        self.execute(
            Method::PUT,
            &format!("/api/tasks/{task_id}/comments/{comment_id}"),
            Some(&request),
        )
        .await
    }

    pub async fn delete_comment(&self, task_id: i32, comment_id: i32) -> Result<(), ApiClientError> {
        self.execute::<()>(
            Method::DELETE,
            &format!("/api/tasks/{task_id}/comments/{comment_id}"),
            None,
        )
        .await
    }
}
