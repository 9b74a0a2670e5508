//! Authentication middleware for JWT token validation

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Authentication middleware
///
/// A request without an `Authorization` header is rejected with 401. A
/// header that does not carry a valid, unexpired `Bearer` token is rejected
/// with 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract the Authorization header; an empty value counts as absent
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .filter(|header| !header.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    // Check if it's a Bearer token
    let token = auth_header
        .to_str()
        .ok()
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("Rejected malformed Authorization header");
            ApiError::Forbidden
        })?;

    // Validate the token
    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        warn!("Failed to validate token: {}", e);
        ApiError::Forbidden
    })?;

    req.extensions_mut().insert(AuthUser {
        username: claims.username,
    });

    Ok(next.run(req).await)
}
