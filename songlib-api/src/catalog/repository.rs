//! Catalog store seam
//!
//! The catalog core talks to persistent storage only through
//! [`CatalogRepository`]. Every method is one self-contained read or write.

use async_trait::async_trait;
use chrono::NaiveDate;
use songlib_common::db::Song;
use songlib_common::Result;

use super::filter::Predicate;
use super::patch::UpdateSet;

/// Song to insert; the id is assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub group_id: i64,
    pub name: String,
    pub release_date: Option<NaiveDate>,
    pub lyrics: Option<String>,
    pub link: Option<String>,
}

/// Complete replacement of a song's mutable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongReplacement {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub lyrics: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub link: Option<String>,
}

/// Persistent store for groups and songs
///
/// Missing songs or groups are reported as `Error::NotFound`.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_group_id_by_name(&self, name: &str) -> Result<i64>;

    /// Insert a song and return its new id
    async fn insert_song(&self, song: NewSong) -> Result<i64>;

    async fn replace_song(&self, replacement: SongReplacement) -> Result<()>;

    /// Write exactly the fields in `updates`; an empty set only checks that
    /// the song exists
    async fn apply_partial_update(&self, id: i64, updates: &UpdateSet) -> Result<()>;

    async fn delete_song(&self, id: i64) -> Result<()>;

    /// Songs matching `predicate`, ordered by id ascending
    ///
    /// `limit <= 0` means no limit; `offset < 0` is treated as 0.
    async fn list_songs(&self, predicate: &Predicate, limit: i64, offset: i64) -> Result<Vec<Song>>;

    /// Stored lyrics of a song, `None` when the song has none
    async fn get_lyrics(&self, song_id: i64) -> Result<Option<String>>;
}
