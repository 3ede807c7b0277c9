use axum::{
    http::{header, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::config::ApiConfig;
use crate::web::{
    middleware::identity,
    routes::{comment_routes, tag_routes, task_routes, todo_list_routes, TOTAL_COUNT_HEADER},
};

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub config: Arc<ApiConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(db_pool: DatabaseConnection, config: Arc<ApiConfig>) -> Router {
    let app_state = Arc::new(AppState { db_pool, config });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([TOTAL_COUNT_HEADER]);

    let identity_layer =
        axum_middleware::from_fn_with_state(app_state.clone(), identity::identity);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .nest(
            "/api/lists",
            todo_list_routes::todo_list_routes()
                .merge(task_routes::list_task_routes())
                .route_layer(identity_layer.clone()),
        )
        .nest(
            "/api/tasks",
            task_routes::task_routes()
                .merge(tag_routes::task_tag_routes())
                .merge(comment_routes::comment_routes())
                .route_layer(identity_layer.clone()),
        )
        .nest(
            "/api/tags",
            tag_routes::tag_routes().route_layer(identity_layer),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
