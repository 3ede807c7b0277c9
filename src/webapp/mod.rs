use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::webapp::api_client::ApiClient;
use crate::webapp::routes::{comment_pages, list_pages, search_pages, tag_pages, task_pages};
use crate::webapp::views::Views;

pub mod api_client;
pub mod config;
pub mod error;
pub mod flash;
pub mod models;
pub mod routes;
pub mod views;

pub use error::WebAppError;

pub struct WebState {
    pub api: ApiClient,
    pub views: Views,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

/// Server-rendered pages backed by the JSON API.
pub fn create_webapp_router(api: ApiClient, views: Views) -> Router {
    let state = Arc::new(WebState { api, views });

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(list_pages::list_pages())
        .merge(task_pages::task_pages())
        .merge(tag_pages::tag_pages())
        .merge(comment_pages::comment_pages())
        .merge(search_pages::search_pages())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
