//! HTTP API handlers for songlib-api

pub mod filter;
pub mod health;
pub mod songs;
pub mod verses;

pub use health::health_routes;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use crate::AppState;

/// Song catalog routes
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs/filter", post(filter::filter_songs))
        .route("/songs/:id/verses", get(verses::get_verses))
        .route("/songs/add", post(songs::insert_song))
        .route("/songs/update", put(songs::replace_song))
        .route("/songs/delete", delete(songs::delete_song))
        .route("/songs/:id", patch(songs::patch_song))
}
