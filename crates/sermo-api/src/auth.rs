use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
};
use tracing::{info, warn};

use sermo_types::api::{CreateUserRequest, LoginRequest};

use crate::convert;
use crate::error::ApiError;
use crate::middleware::TOKEN_HEADER;
use crate::password::{hash_off_thread, verify_off_thread};
use crate::state::AppState;

/// POST /user: sign up. The plaintext password is hashed before it reaches
/// the store.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let password_hash = match req.password.clone() {
        Some(plaintext) => Some(hash_off_thread(plaintext).await?),
        None => None,
    };

    let row = state
        .run_db(move |db| db.create_user(req.email.as_deref(), password_hash.as_deref()))
        .await?;

    info!(userid = %row.userid, "User created");
    Ok((StatusCode::CREATED, Json(convert::user(row))))
}

/// POST /user/login: verify credentials and hand out a token in the `Token`
/// response header.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let email = req.email.clone();
    let user = state
        .run_db(move |db| db.get_user_by_email(&email))
        .await?
        .found()
        .ok_or(ApiError::NotFound("User"))?;

    if !verify_off_thread(user.password.clone(), req.password).await? {
        warn!(email = %req.email, "Failed login");
        return Err(ApiError::InvalidLogin);
    }

    let token = state
        .tokens
        .issue()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let token = HeaderValue::from_str(&token).map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(userid = %user.userid, "User logged in");
    Ok(([(TOKEN_HEADER, token)], Json(convert::user(user))))
}
