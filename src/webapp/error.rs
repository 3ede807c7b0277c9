use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::webapp::api_client::ApiClientError;

#[derive(Error, Debug)]
pub enum WebAppError {
    #[error(transparent)]
    Api(#[from] ApiClientError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl WebAppError {
    /// Not-found, forbidden and bad-request answers from the API pass through;
    /// any other API failure is a bad gateway.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            WebAppError::Api(err) => match err.status() {
                Some(status @ (StatusCode::NOT_FOUND
                | StatusCode::FORBIDDEN
                | StatusCode::BAD_REQUEST)) => (
                    status,
                    err.api_message()
                        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error").to_string()),
                ),
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "The task service is unavailable. Please try again later.".to_string(),
                ),
            },
            WebAppError::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The page could not be rendered.".to_string(),
            ),
            WebAppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            WebAppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
        }
    }
}

impl IntoResponse for WebAppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, %status, "Web request failed.");
        }

        let body = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{code}</title>\
             <link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css\"></head>\
             <body class=\"container py-4\"><h1 class=\"h4\">{code} {reason}</h1>\
             <p class=\"text-danger\">{message}</p><a href=\"/\">Back to lists</a></body></html>",
            code = status.as_u16(),
            reason = status.canonical_reason().unwrap_or(""),
            message = tera::escape_html(&message),
        );
        (status, Html(body)).into_response()
    }
}
