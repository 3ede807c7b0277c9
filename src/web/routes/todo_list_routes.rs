use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::db::services::TodoListService;
use crate::services::paging::PagingParams;
use crate::web::models::{AuthenticatedUser, TodoListRequest, TodoListResponse};
use crate::web::routes::paged_response;
use crate::web::{AppError, AppState};

pub fn todo_list_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_lists).post(create_list))
        .route("/{id}", get(get_list).put(update_list).delete(delete_list))
}

async fn list_lists(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(paging): Query<PagingParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.config.paging_limits().resolve(paging);
    let lists = TodoListService::get_mine(&app_state.db_pool, &user.id, page).await?;

    let items: Vec<TodoListResponse> = lists.items.into_iter().map(Into::into).collect();
    Ok(paged_response(lists.total, items))
}

async fn create_list(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    WithRejection(Json(payload), _): WithRejection<Json<TodoListRequest>, AppError>,
) -> Result<(StatusCode, Json<TodoListResponse>), AppError> {
    payload.validate()?;
    let list =
        TodoListService::create(&app_state.db_pool, &user.id, payload.title, payload.description)
            .await?;
    Ok((StatusCode::CREATED, Json(list.into())))
}

async fn get_list(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<TodoListResponse>, AppError> {
    let list = TodoListService::get_by_id(&app_state.db_pool, id, &user.id).await?;
    Ok(Json(list.into()))
}

async fn update_list(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    WithRejection(Json(payload), _): WithRejection<Json<TodoListRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    TodoListService::update(
        &app_state.db_pool,
        id,
        &user.id,
        payload.title,
        payload.description,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_list(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    TodoListService::delete(&app_state.db_pool, id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
