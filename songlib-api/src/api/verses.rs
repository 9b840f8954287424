//! Verse paging

use axum::{
    extract::{Path, Query, State},
    extract::rejection::{PathRejection, QueryRejection},
    Json,
};
use serde::Deserialize;

use crate::catalog::VersePage;
use crate::{ApiResult, AppState};

/// Query parameters for verse paging
///
/// Values that are missing or not integers fall back to the defaults
/// (limit 10, offset 0), same as non-positive ones.
#[derive(Debug, Default, Deserialize)]
pub struct VerseQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl VerseQuery {
    fn limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(|v| v.trim().parse().ok())
    }

    fn offset(&self) -> Option<i64> {
        self.offset.as_deref().and_then(|v| v.trim().parse().ok())
    }
}

/// GET /songs/:id/verses?limit=&offset=
///
/// Returns `{"id": ..., "verses": [...]}`.
pub async fn get_verses(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    query: Result<Query<VerseQuery>, QueryRejection>,
) -> ApiResult<Json<VersePage>> {
    let Path(id) = id?;
    let Query(query) = query?;

    let page = state
        .catalog
        .verse_page(id, query.limit(), query.offset())
        .await?;

    Ok(Json(page))
}
