use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::db::enums::TaskStatus;
use crate::db::services::{AssignedQuery, SortOrder, TaskSearch, TaskService, TaskSortBy};
use crate::services::paging::PagingParams;
use crate::web::models::{
    AssignedToMeQuery, AuthenticatedUser, ChangeStatusRequest, CreateTaskRequest, SearchQuery,
    TaskResponse, UpdateTaskRequest,
};
use crate::web::routes::paged_response;
use crate::web::{AppError, AppState};

/// Routes nested under `/api/lists`.
pub fn list_task_routes() -> Router<Arc<AppState>> {
    Router::new().route("/{id}/tasks", get(list_tasks).post(create_task))
}

/// Routes nested under `/api/tasks`.
pub fn task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assigned-to-me", get(assigned_to_me))
        .route("/search", get(search_tasks))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
        .route("/{id}/status", patch(change_status))
}

async fn list_tasks(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(list_id): Path<i32>,
    Query(paging): Query<PagingParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.config.paging_limits().resolve(paging);
    let tasks = TaskService::get_by_list(&app_state.db_pool, list_id, &user.id, page).await?;

    let today = Utc::now().date_naive();
    let items: Vec<TaskResponse> = tasks
        .items
        .into_iter()
        .map(|t| TaskResponse::from_model(t, today))
        .collect();
    Ok(paged_response(tasks.total, items))
}

async fn create_task(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(list_id): Path<i32>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateTaskRequest>, AppError>,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    let new_task = payload.into_new_task()?;
    let task = TaskService::create(&app_state.db_pool, list_id, &user.id, new_task).await?;
    Ok((
        StatusCode::CREATED,
        Json(TaskResponse::from_model(task, Utc::now().date_naive())),
    ))
}

async fn get_task(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = TaskService::get_by_id(&app_state.db_pool, id, &user.id).await?;
    Ok(Json(TaskResponse::from_model(task, Utc::now().date_naive())))
}

async fn update_task(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateTaskRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    let update = payload.into_update()?;
    TaskService::update(&app_state.db_pool, id, &user.id, update).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_task(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    TaskService::delete(&app_state.db_pool, id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn change_status(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    WithRejection(Json(payload), _): WithRejection<Json<ChangeStatusRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    TaskService::change_status(&app_state.db_pool, id, &user.id, payload.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assigned_to_me(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<AssignedToMeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<TaskStatus>()
                .map_err(|e| AppError::InvalidInput(e.to_string()))?,
        ),
    };
    let params = AssignedQuery {
        status,
        sort_by: TaskSortBy::parse_lenient(query.sort_by.as_deref()),
        order: SortOrder::parse_lenient(query.order.as_deref()),
    };
    let page = app_state.config.paging_limits().resolve(query.paging());

    let tasks = TaskService::get_assigned_to_me(&app_state.db_pool, &user.id, params, page).await?;

    let today = Utc::now().date_naive();
    let items: Vec<TaskResponse> = tasks
        .items
        .into_iter()
        .map(|t| TaskResponse::from_model(t, today))
        .collect();
    Ok(paged_response(tasks.total, items))
}

async fn search_tasks(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let search = TaskSearch::from_query(
        query.title.as_deref(),
        query.created_from.as_deref(),
        query.created_to.as_deref(),
        query.due_from.as_deref(),
        query.due_to.as_deref(),
    )?;
    let page = app_state.config.paging_limits().resolve(query.paging());

    let tasks = TaskService::search(&app_state.db_pool, &search, page).await?;

    let today = Utc::now().date_naive();
    let items: Vec<TaskResponse> = tasks
        .items
        .into_iter()
        .map(|t| TaskResponse::from_model(t, today))
        .collect();
    Ok(paged_response(tasks.total, items))
}
