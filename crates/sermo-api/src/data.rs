//! Generic records. The collection root is the list route, so unlike users
//! and channels there is no banner.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use sermo_types::api::{CreateDataRequest, ResultResponse, UpdateDataRequest};
use sermo_types::models::Data;

use crate::convert::{self, parse_id};
use crate::error::ApiError;
use crate::pagination::{self, PageQuery};
use crate::state::AppState;

/// POST /data
pub async fn create_data(
    State(state): State<AppState>,
    payload: Result<Json<CreateDataRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let row = state
        .run_db(move |db| db.create_data(req.strattr.as_deref(), req.intattr))
        .await?;

    info!(id = %row.id, "Data created");
    Ok((StatusCode::CREATED, Json(convert::data(row))))
}

/// GET /data/{id}
pub async fn get_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Data>, ApiError> {
    let id = parse_id(&id)?.to_string();

    let row = state
        .run_db(move |db| db.get_data(&id))
        .await?
        .found()
        .ok_or(ApiError::NotFound("Data"))?;

    Ok(Json(convert::data(row)))
}

/// GET /data?count=&start=
pub async fn list_data(
    State(state): State<AppState>,
    query: PageQuery,
) -> Result<Json<Vec<Data>>, ApiError> {
    let page = pagination::page(query);

    let rows = state
        .run_db(move |db| db.list_data(page.start, page.count))
        .await?;

    Ok(Json(rows.into_iter().map(convert::data).collect()))
}

/// PUT /data/{id}
pub async fn update_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDataRequest>, JsonRejection>,
) -> Result<Json<Data>, ApiError> {
    let id = parse_id(&id)?.to_string();
    let Json(req) = payload?;

    let row = state
        .run_db(move |db| db.update_data(&id, req.strattr.as_deref(), req.intattr))
        .await?
        .found()
        .ok_or(ApiError::NotFound("Data"))?;

    Ok(Json(convert::data(row)))
}

/// DELETE /data/{id}
pub async fn delete_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?.to_string();

    let target = id.clone();
    state
        .run_db(move |db| db.delete_data(&target))
        .await?
        .found()
        .ok_or(ApiError::NotFound("Data"))?;

    info!(id = %id, "Data deleted");
    Ok(Json(ResultResponse {
        result: "data deleted".to_string(),
    }))
}
