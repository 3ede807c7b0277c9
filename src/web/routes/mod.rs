use axum::http::HeaderName;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::web::error::AppError;

pub mod comment_routes;
pub mod tag_routes;
pub mod task_routes;
pub mod todo_list_routes;

/// Carries the unpaged row count of a paged endpoint.
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

pub(crate) fn paged_response<T: Serialize>(total: u64, items: Vec<T>) -> impl IntoResponse {
    ([(TOTAL_COUNT_HEADER, total.to_string())], Json(items))
}

/// Tag and link endpoints reject non-positive ids before touching the store.
pub(crate) fn ensure_positive_id(id: i32, name: &str) -> Result<(), AppError> {
    if id <= 0 {
        return Err(AppError::InvalidInput(format!("Invalid {name}.")));
    }
    Ok(())
}
