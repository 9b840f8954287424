//! Catalog operations
//!
//! Each operation validates its input, makes at most one store write, and
//! bounds every store and enricher call by the configured [`Deadlines`].
//! Nothing is cached between calls.

use songlib_common::config::Deadlines;
use songlib_common::db::Song;
use songlib_common::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::filter::{self, FilterRequest};
use super::insert::{build_new_song, InsertRequest};
use super::patch::{self, PatchRequest, UpdateSet};
use super::replace::{self, ReplaceRequest};
use super::repository::CatalogRepository;
use super::verses::{page_window, VersePage, VerseWindow};
use crate::services::MetadataEnricher;

/// Stateless catalog facade shared by all request handlers
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
    enricher: Arc<dyn MetadataEnricher>,
    deadlines: Deadlines,
}

impl CatalogService {
    pub fn new(
        repo: Arc<dyn CatalogRepository>,
        enricher: Arc<dyn MetadataEnricher>,
        deadlines: Deadlines,
    ) -> Self {
        Self {
            repo,
            enricher,
            deadlines,
        }
    }

    pub fn deadlines(&self) -> Deadlines {
        self.deadlines
    }

    /// Look up the group, enrich, then insert; returns the new song id
    pub async fn insert_song(&self, req: &InsertRequest) -> Result<i64> {
        req.validate()?;

        let group_id = self
            .store("find group", self.repo.find_group_id_by_name(&req.group))
            .await
            .inspect_err(|e| warn!(group = %req.group, error = %e, "Group lookup failed"))?;

        let details = bounded(
            self.deadlines.enricher,
            "Metadata service timed out",
            async { self.enricher.lookup(&req.group, &req.song).await.map_err(Error::from) },
        )
        .await
        .inspect_err(|e| {
            tracing::error!(group = %req.group, song = %req.song, error = %e, "Metadata lookup failed")
        })?;

        let new_song = build_new_song(group_id, req, details)?;
        let id = self.store("insert song", self.repo.insert_song(new_song)).await?;

        info!(song_id = id, group = %req.group, song = %req.song, "Song inserted");
        Ok(id)
    }

    /// Filtered listing ordered by song id
    pub async fn list_songs(&self, req: &FilterRequest) -> Result<Vec<Song>> {
        let compiled = filter::compile(req)?;
        debug!(predicate = ?compiled.predicate, limit = compiled.limit, offset = compiled.offset, "Compiled song filter");

        let songs = self
            .store(
                "list songs",
                self.repo
                    .list_songs(&compiled.predicate, compiled.limit, compiled.offset),
            )
            .await?;

        info!(song_count = songs.len(), "Fetched songs");
        Ok(songs)
    }

    /// One page of a song's verses
    pub async fn verse_page(&self, song_id: i64, limit: Option<i64>, offset: Option<i64>) -> Result<VersePage> {
        if song_id <= 0 {
            return Err(Error::Validation("Invalid song ID".to_string()));
        }
        let window = VerseWindow::new(limit, offset);

        let lyrics = self.store("get lyrics", self.repo.get_lyrics(song_id)).await?;
        let verses = page_window(lyrics.as_deref(), window);

        debug!(song_id, limit = window.limit, offset = window.offset, verse_count = verses.len(), "Paged verses");
        Ok(VersePage { id: song_id, verses })
    }

    /// Overwrite every mutable field of a song
    pub async fn replace_song(&self, req: &ReplaceRequest) -> Result<()> {
        let replacement = replace::compile(req)?;
        self.store("replace song", self.repo.replace_song(replacement)).await?;

        info!(song_id = req.id, "Song replaced");
        Ok(())
    }

    /// Apply only the supplied fields; returns what was written
    pub async fn patch_song(&self, req: &PatchRequest) -> Result<UpdateSet> {
        let compiled = patch::compile(req)?;
        debug!(song_id = compiled.song_id, fields = ?compiled.updates.field_names(), "Compiled partial update");

        self.store(
            "patch song",
            self.repo.apply_partial_update(compiled.song_id, &compiled.updates),
        )
        .await?;

        info!(song_id = compiled.song_id, field_count = compiled.updates.len(), "Song patched");
        Ok(compiled.updates)
    }

    pub async fn delete_song(&self, song_id: i64) -> Result<()> {
        if song_id <= 0 {
            return Err(Error::Validation("Invalid song ID".to_string()));
        }
        self.store("delete song", self.repo.delete_song(song_id)).await?;

        info!(song_id, "Song deleted");
        Ok(())
    }

    async fn store<T>(&self, operation: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        bounded(
            self.deadlines.repository,
            &format!("Catalog store timed out during {}", operation),
            fut,
        )
        .await
    }
}

/// Run `fut` with a deadline; expiry becomes `Error::Unavailable`
async fn bounded<T>(limit: Duration, timeout_message: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "{}", timeout_message);
            Err(Error::Unavailable(timeout_message.to_string()))
        }
    }
}
