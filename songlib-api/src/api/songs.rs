//! Song mutations: insert, replace, patch, delete

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::catalog::{InsertRequest, PatchRequest, ReplaceRequest};
use crate::{ApiError, ApiResult, AppState};

/// Response for a created song
#[derive(Debug, Serialize)]
pub struct InsertResponse {
    pub id: i64,
}

/// POST /songs/add
///
/// Body: `{"group": "...", "song": "..."}`. The group must already exist;
/// release date, lyrics and link come from the metadata service. Nothing is
/// written if the lookup fails.
pub async fn insert_song(
    State(state): State<AppState>,
    payload: Result<Json<InsertRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<InsertResponse>)> {
    let Json(req) = payload?;
    debug!(group = %req.group, song = %req.song, "Decoded insert request");

    let id = state.catalog.insert_song(&req).await?;
    Ok((StatusCode::CREATED, Json(InsertResponse { id })))
}

/// PUT /songs/update
///
/// Body: `{"id", "group_id", "song_name", "text", "release_date", "link"}`,
/// all required; every field is overwritten.
pub async fn replace_song(
    State(state): State<AppState>,
    payload: Result<Json<ReplaceRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;
    debug!(
        song_id = req.id,
        group_id = req.group_id,
        song_name = %req.song_name,
        release_date = %req.release_date,
        "Decoded replace request"
    );

    state.catalog.replace_song(&req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Body of `PATCH /songs/:id`
///
/// Omitted (or `null`) fields keep their stored values. `id` is optional
/// since the path already names the song.
#[derive(Debug, Default, Deserialize)]
pub struct PatchSongBody {
    pub id: Option<i64>,
    pub group_id: Option<i64>,
    pub song_name: Option<String>,
    pub text: Option<String>,
    pub release_date: Option<String>,
    pub link: Option<String>,
}

/// Response for a patched song
#[derive(Debug, Serialize)]
pub struct PatchResponse {
    pub id: i64,
    pub updated_fields: Vec<&'static str>,
}

/// PATCH /songs/:id
pub async fn patch_song(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PatchSongBody>, JsonRejection>,
) -> ApiResult<Json<PatchResponse>> {
    let Path(song_id) = id?;
    let Json(body) = payload?;

    if let Some(body_id) = body.id {
        if body_id != song_id {
            warn!(path_id = song_id, body_id, "Patch id mismatch");
            return Err(ApiError::BadRequest(
                "Song ID in body does not match path".to_string(),
            ));
        }
    }

    let req = PatchRequest {
        song_id,
        group_id: body.group_id,
        name: body.song_name,
        lyrics: body.text,
        release_date: body.release_date,
        link: body.link,
    };

    let applied = state.catalog.patch_song(&req).await?;
    Ok(Json(PatchResponse {
        id: song_id,
        updated_fields: applied.field_names(),
    }))
}

/// Query parameters for delete
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: i64,
}

/// DELETE /songs/delete?id=
pub async fn delete_song(
    State(state): State<AppState>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query.map_err(|_| ApiError::BadRequest("Invalid song ID".to_string()))?;

    state.catalog.delete_song(query.id).await?;
    Ok(Json(json!({ "message": "Song successfully deleted" })))
}
