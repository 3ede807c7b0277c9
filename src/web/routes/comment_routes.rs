use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::db::services::CommentService;
use crate::web::models::{AuthenticatedUser, CommentRequest, CommentResponse};
use crate::web::{AppError, AppState};

/// Routes nested under `/api/tasks`.
pub fn comment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{id}/comments", get(list_comments).post(create_comment))
        .route(
            "/{id}/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
}

async fn list_comments(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(task_id): Path<i32>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments = CommentService::get_by_task(&app_state.db_pool, task_id, &user.id).await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

async fn create_comment(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(task_id): Path<i32>,
    WithRejection(Json(payload), _): WithRejection<Json<CommentRequest>, AppError>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    payload.validate()?;
    let comment =
        CommentService::create(&app_state.db_pool, task_id, &user.id, payload.text).await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

async fn update_comment(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((task_id, comment_id)): Path<(i32, i32)>,
    WithRejection(Json(payload), _): WithRejection<Json<CommentRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    CommentService::update(&app_state.db_pool, task_id, comment_id, &user.id, payload.text)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_comment(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((task_id, comment_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    CommentService::delete(&app_state.db_pool, task_id, comment_id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
