use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use sermo_types::api::{CreateChannelRequest, ResultResponse, UpdateChannelRequest};
use sermo_types::models::Channel;

use crate::convert::{self, parse_id};
use crate::error::ApiError;
use crate::pagination::{self, PageQuery};
use crate::state::AppState;

/// GET /channel
pub async fn channel_home(State(state): State<AppState>) -> String {
    format!("Welcome to Sermo's - Channels API\nENV: {}", state.environment)
}

/// POST /channel. The owner must be an existing user.
pub async fn create_channel(
    State(state): State<AppState>,
    payload: Result<Json<CreateChannelRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let owner = req.userid.map(|id| id.to_string());

    let row = state
        .run_db(move |db| {
            db.create_channel(req.channelname.as_deref(), req.maxpopulation, owner.as_deref())
        })
        .await?;

    info!(channelid = %row.channelid, owner = %row.userid, "Channel created");
    Ok((StatusCode::CREATED, Json(convert::channel(row))))
}

/// GET /channel/{id}
pub async fn get_channel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Channel>, ApiError> {
    let id = parse_id(&id)?.to_string();

    let row = state
        .run_db(move |db| db.get_channel(&id))
        .await?
        .found()
        .ok_or(ApiError::NotFound("Channel"))?;

    Ok(Json(convert::channel(row)))
}

/// GET /channels?count=&start=
pub async fn list_channels(
    State(state): State<AppState>,
    query: PageQuery,
) -> Result<Json<Vec<Channel>>, ApiError> {
    let page = pagination::page(query);

    let rows = state
        .run_db(move |db| db.list_channels(page.start, page.count))
        .await?;

    Ok(Json(rows.into_iter().map(convert::channel).collect()))
}

/// PUT /channel/{id}
pub async fn update_channel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateChannelRequest>, JsonRejection>,
) -> Result<Json<Channel>, ApiError> {
    let id = parse_id(&id)?.to_string();
    let Json(req) = payload?;

    let row = state
        .run_db(move |db| db.update_channel(&id, req.channelname.as_deref(), req.maxpopulation))
        .await?
        .found()
        .ok_or(ApiError::NotFound("Channel"))?;

    Ok(Json(convert::channel(row)))
}

/// DELETE /channel/{id}
pub async fn delete_channel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?.to_string();

    let target = id.clone();
    state
        .run_db(move |db| db.delete_channel(&target))
        .await?
        .found()
        .ok_or(ApiError::NotFound("Channel"))?;

    info!(channelid = %id, "Channel deleted");
    Ok(Json(ResultResponse {
        result: "channel deleted".to_string(),
    }))
}
