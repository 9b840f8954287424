//! Shared fixtures for songlib-api integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use songlib_api::catalog::{CatalogService, SqliteCatalog};
use songlib_api::services::{EnrichError, MetadataEnricher, SongDetails};
use songlib_common::config::Deadlines;
use songlib_common::db::init::{connect_in_memory, seed_groups};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scripted metadata service behavior
#[derive(Clone)]
pub enum Behavior {
    Respond(SongDetails),
    Status(u16),
    Malformed,
    Hang(Duration),
}

pub struct StubEnricher {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl StubEnricher {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataEnricher for StubEnricher {
    async fn lookup(&self, _group: &str, _song: &str) -> Result<SongDetails, EnrichError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Respond(details) => Ok(details.clone()),
            Behavior::Status(code) => Err(EnrichError::ApiError(*code, "stub failure".to_string())),
            Behavior::Malformed => Err(EnrichError::ParseError("expected value".to_string())),
            Behavior::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Err(EnrichError::NetworkError("stub hung".to_string()))
            }
        }
    }
}

pub fn bohemian_details() -> SongDetails {
    SongDetails {
        release_date: "31.10.1975".to_string(),
        text: "Is this the real life\n\nIs this just fantasy".to_string(),
        link: "http://example.com/bohemian".to_string(),
    }
}

/// In-memory catalog with groups Queen (id 1) and Muse (id 2)
pub async fn memory_catalog() -> SqliteCatalog {
    let pool = connect_in_memory().await.expect("in-memory database");
    seed_groups(&pool, &["Queen".to_string(), "Muse".to_string()])
        .await
        .expect("seed groups");
    SqliteCatalog::new(pool)
}

pub fn service(catalog: SqliteCatalog, enricher: Arc<StubEnricher>) -> CatalogService {
    CatalogService::new(Arc::new(catalog), enricher, Deadlines::default())
}

/// Insert a song row directly, bypassing the enricher
pub async fn insert_raw(
    catalog: &SqliteCatalog,
    group_id: i64,
    name: &str,
    release_date: Option<&str>,
    lyrics: Option<&str>,
    link: Option<&str>,
) -> i64 {
    sqlx::query(
        "INSERT INTO songs (group_id, name, release_date, lyrics, link) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(group_id)
    .bind(name)
    .bind(release_date)
    .bind(lyrics)
    .bind(link)
    .execute(catalog.pool())
    .await
    .expect("insert song")
    .last_insert_rowid()
}

pub async fn song_count(catalog: &SqliteCatalog) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(catalog.pool())
        .await
        .expect("count songs")
}
