use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the bearer token, on requests and on the login response.
/// Deliberately not `Authorization`, for compatibility with existing clients.
pub const TOKEN_HEADER: &str = "token";

/// Require a valid token in the `Token` header before running the handler.
/// The request is passed on untouched; the token carries no identity.
pub async fn require_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    if !state.tokens.validate(token) {
        warn!(path = %req.uri().path(), "Rejected request with invalid token");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}
