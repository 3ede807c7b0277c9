use axum::http::StatusCode;

use crate::webapp::api_client::ApiClientError;
use crate::webapp::error::WebAppError;

pub mod comment_pages;
pub mod list_pages;
pub mod search_pages;
pub mod tag_pages;
pub mod task_pages;

pub(crate) const STATUSES: [&str; 3] = ["NotStarted", "InProgress", "Completed"];

/// A 400 from the API is shown next to the form instead of on an error page.
pub(crate) fn form_error(err: ApiClientError) -> Result<String, WebAppError> {
    if err.status() == Some(StatusCode::BAD_REQUEST) {
        Ok(err
            .api_message()
            .unwrap_or_else(|| "The request was rejected.".to_string()))
    } else {
        Err(err.into())
    }
}
