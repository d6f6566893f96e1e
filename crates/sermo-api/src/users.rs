use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use tracing::info;

use sermo_types::api::{ResultResponse, UpdateUserRequest};
use sermo_types::models::User;

use crate::convert::{self, parse_id};
use crate::error::ApiError;
use crate::pagination::{self, PageQuery};
use crate::password::hash_off_thread;
use crate::state::AppState;

/// GET /user
pub async fn user_home(State(state): State<AppState>) -> String {
    format!("Welcome to Sermo's - Users API\nENV: {}", state.environment)
}

/// GET /user/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?.to_string();

    let row = state
        .run_db(move |db| db.get_user(&id))
        .await?
        .found()
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(convert::user(row)))
}

/// GET /users?count=&start=
pub async fn list_users(
    State(state): State<AppState>,
    query: PageQuery,
) -> Result<Json<Vec<User>>, ApiError> {
    let page = pagination::page(query);

    let rows = state
        .run_db(move |db| db.list_users(page.start, page.count))
        .await?;

    Ok(Json(rows.into_iter().map(convert::user).collect()))
}

/// PUT /user/{id}. The id in the path wins over anything in the body.
/// The password is re-hashed only when a new one is supplied.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?.to_string();
    let Json(req) = payload?;

    let password_hash = match req.password.clone() {
        Some(plaintext) if !plaintext.is_empty() => Some(hash_off_thread(plaintext).await?),
        _ => None,
    };

    let row = state
        .run_db(move |db| db.update_user(&id, req.email.as_deref(), password_hash.as_deref()))
        .await?
        .found()
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(convert::user(row)))
}

/// DELETE /user/{id}. Also removes the user's channels.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?.to_string();

    let target = id.clone();
    state
        .run_db(move |db| db.delete_user(&target))
        .await?
        .found()
        .ok_or(ApiError::NotFound("User"))?;

    info!(userid = %id, "User deleted");
    Ok(Json(ResultResponse {
        result: "user deleted".to_string(),
    }))
}
