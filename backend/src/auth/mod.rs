//! Bearer-token authentication for the protected routes.

pub mod jwt;
pub mod password;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};
use tracing::warn;

use crate::domain::models::user::Role;
use crate::rest::{ApiError, AppState};

/// The authenticated principal, injected into request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

/// Middleware: resolve `Authorization: Bearer <token>` into an [`AuthUser`].
///
/// The user is re-loaded from the store so a token for a deleted account
/// stops working immediately.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(ApiError::unauthorized("Access denied. No token provided."));
    };

    let claims = state
        .jwt
        .verify(token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token."))?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::unauthorized("Invalid or expired token."))?;

    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(ApiError::internal)?;

    let Some(user) = user else {
        warn!("Token subject {} no longer exists", user_id);
        return Err(ApiError::unauthorized("Invalid token. User not found."));
    };

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
        role: user.role,
    });

    Ok(next.run(req).await)
}

/// Middleware: restrict a route group to admin accounts.
/// Must run inside [`require_auth`].
pub async fn require_admin(
    Extension(user): Extension<AuthUser>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if user.role != Role::Admin {
        return Err(ApiError::forbidden(
            "Access denied. Insufficient permissions.",
        ));
    }
    Ok(next.run(req).await)
}
