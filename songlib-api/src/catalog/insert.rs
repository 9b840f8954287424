//! Song insertion
//!
//! Clients name only the group and the song; release date, lyrics and link
//! come from the metadata enricher.

use serde::Deserialize;
use songlib_common::dates::parse_enricher_date;
use songlib_common::{Error, Result};

use super::repository::NewSong;
use crate::services::SongDetails;

/// Body of `POST /songs/add`
#[derive(Debug, Clone, Deserialize)]
pub struct InsertRequest {
    pub group: String,
    pub song: String,
}

impl InsertRequest {
    /// Reject blank names before any lookup is made
    pub fn validate(&self) -> Result<()> {
        if self.group.trim().is_empty() {
            return Err(Error::Validation("group must not be empty".to_string()));
        }
        if self.song.trim().is_empty() {
            return Err(Error::Validation("song must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Combine the request with enricher details into a row to insert
///
/// A release date the enricher formats wrongly makes the whole payload
/// malformed.
pub fn build_new_song(group_id: i64, req: &InsertRequest, details: SongDetails) -> Result<NewSong> {
    let release_date = parse_enricher_date(&details.release_date)?;

    Ok(NewSong {
        group_id,
        name: req.song.clone(),
        release_date: Some(release_date),
        lyrics: Some(details.text),
        link: Some(details.link),
    })
}
