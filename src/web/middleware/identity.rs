use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::web::models::{AuthenticatedUser, Claims};
use crate::web::{AppState, error::AppError};

/// Requester used when a request carries no usable bearer token.
pub const DEV_USER_ID: &str = "dev-user";

/// Resolves the requester and stores it as a request extension.
///
/// A bearer token is only honoured when a JWT secret is configured; a token
/// that fails validation is rejected rather than downgraded to the
/// placeholder identity.
pub async fn identity(
    State(state): State<Arc<AppState>>,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    let user = match (state.config.jwt_secret.as_deref(), token) {
        (Some(secret), Some(token)) => {
            let token_data = decode::<Claims>(
                token,
                &DecodingKey::from_secret(secret.as_bytes()),
                &Validation::default(),
            )
            .map_err(|e| {
                warn!(error = ?e, "JWT decoding error during identity middleware.");
                AppError::Unauthorized("Invalid or expired token.".to_string())
            })?;
            AuthenticatedUser {
                id: token_data.claims.sub,
            }
        }
        _ => AuthenticatedUser {
            id: DEV_USER_ID.to_string(),
        },
    };

    debug!(user = %user.id, "Resolved requester.");
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
