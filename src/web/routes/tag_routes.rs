use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::db::services::TagService;
use crate::web::models::{CreateTagRequest, TagResponse, TaskResponse};
use crate::web::routes::ensure_positive_id;
use crate::web::{AppError, AppState};

/// Routes nested under `/api/tags`.
pub fn tag_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/{tag_id}", delete(delete_tag))
        .route("/{tag_id}/tasks", get(tasks_for_tag))
}

/// Task-side link routes, nested under `/api/tasks`.
pub fn task_tag_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{id}/tags", get(tags_for_task))
        .route("/{id}/tags/{tag_id}", post(link_tag).delete(unlink_tag))
}

async fn list_tags(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = TagService::list_tags(&app_state.db_pool).await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

async fn create_tag(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateTagRequest>, AppError>,
) -> Result<(StatusCode, Json<TagResponse>), AppError> {
    let tag = TagService::create_tag(&app_state.db_pool, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

async fn delete_tag(
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    ensure_positive_id(tag_id, "tagId")?;
    TagService::delete_tag(&app_state.db_pool, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn tasks_for_tag(
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<i32>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    ensure_positive_id(tag_id, "tagId")?;
    let tasks = TagService::tasks_for_tag(&app_state.db_pool, tag_id).await?;

    let today = Utc::now().date_naive();
    Ok(Json(
        tasks
            .into_iter()
            .map(|t| TaskResponse::from_tagged(t, today))
            .collect(),
    ))
}

async fn tags_for_task(
    State(app_state): State<Arc<AppState>>,
    Path(task_id): Path<i32>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    ensure_positive_id(task_id, "task id")?;
    let tags = TagService::tags_for_task(&app_state.db_pool, task_id).await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

async fn link_tag(
    State(app_state): State<Arc<AppState>>,
    Path((task_id, tag_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    ensure_positive_id(task_id, "id")?;
    ensure_positive_id(tag_id, "id")?;
    TagService::link(&app_state.db_pool, task_id, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unlink_tag(
    State(app_state): State<Arc<AppState>>,
    Path((task_id, tag_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    ensure_positive_id(task_id, "id")?;
    ensure_positive_id(tag_id, "id")?;
    TagService::unlink(&app_state.db_pool, task_id, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
