use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use std::sync::Arc;

use crate::webapp::WebState;
use crate::webapp::error::WebAppError;
use crate::webapp::models::CommentForm;

pub fn comment_pages() -> Router<Arc<WebState>> {
    Router::new()
        .route("/tasks/{id}/comments", post(create_comment))
        .route("/tasks/{id}/comments/{comment_id}/edit", post(update_comment))
        .route("/tasks/{id}/comments/{comment_id}/delete", post(delete_comment))
}

fn back_to_task(task_id: i32) -> Response {
    Redirect::to(&format!("/tasks/{task_id}")).into_response()
}

/// Blank text is ignored.
async fn create_comment(
    State(state): State<Arc<WebState>>,
    Path(task_id): Path<i32>,
    Form(form): Form<CommentForm>,
) -> Result<Response, WebAppError> {
    if let Some(text) = form.text() {
        state.api.create_comment(task_id, &text).await?;
    }
    Ok(back_to_task(task_id))
}

async fn update_comment(
    State(state): State<Arc<WebState>>,
    Path((task_id, comment_id)): Path<(i32, i32)>,
    Form(form): Form<CommentForm>,
) -> Result<Response, WebAppError> {
    if let Some(text) = form.text() {
        state.api.update_comment(task_id, comment_id, &text).await?;
    }
    Ok(back_to_task(task_id))
}

async fn delete_comment(
    State(state): State<Arc<WebState>>,
    Path((task_id, comment_id)): Path<(i32, i32)>,
) -> Result<Response, WebAppError> {
    state.api.delete_comment(task_id, comment_id).await?;
    Ok(back_to_task(task_id))
}
