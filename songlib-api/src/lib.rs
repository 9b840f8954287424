//! songlib-api library - song catalog service
//!
//! Stores songs grouped by performing act, enriches new songs from an
//! external metadata service, and serves filtered listings, verse pages and
//! partial updates over HTTP.

pub mod api;
pub mod catalog;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::http::Method;
use axum::Router;
use chrono::{DateTime, Utc};
use catalog::CatalogService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog operations (store + enricher behind deadlines)
    pub catalog: CatalogService,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            catalog,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(300));

    Router::new()
        .merge(api::song_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
