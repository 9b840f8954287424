//! Filtered song listing

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use songlib_common::db::Song;
use tracing::debug;

use crate::catalog::FilterRequest;
use crate::{ApiResult, AppState};

/// POST /songs/filter
///
/// Body: `{"group"?, "song"?, "release_date"? (YYYY-MM-DD), "limit", "offset"}`.
/// Absent fields do not constrain the result; rows come back in id order.
pub async fn filter_songs(
    State(state): State<AppState>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Song>>> {
    let Json(req) = payload?;

    debug!(
        group = ?req.group,
        song = ?req.song,
        release_date = ?req.release_date,
        limit = req.limit,
        offset = req.offset,
        "Decoded filter request"
    );

    let songs = state.catalog.list_songs(&req).await?;
    Ok(Json(songs))
}
