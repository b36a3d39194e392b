//! JWT middleware in front of the admin routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

use super::token;

/// Authenticated identity extracted from a verified bearer token
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i32,
}

/// Extracts and verifies the bearer token from the Authorization header,
/// then stashes the identity in request extensions for the wrapped handler.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let bearer = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = token::verify(bearer, &state.token_domain, &state.jwt_secret).map_err(|e| {
        tracing::debug!("token rejected: {e}");
        ApiError::Unauthorized
    })?;

    let user_id: i32 = claims.sub.parse().map_err(|_| ApiError::Unauthorized)?;

    request.extensions_mut().insert(Identity { user_id });

    Ok(next.run(request).await)
}
