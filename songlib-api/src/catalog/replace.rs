//! Full song replacement
//!
//! Every field is required and every field is written. Empty `text`, `link`
//! or `release_date` strings clear the stored value.

use serde::Deserialize;
use songlib_common::dates::parse_api_date;
use songlib_common::{Error, Result};

use super::repository::SongReplacement;

/// Body of `PUT /songs/update`
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceRequest {
    pub id: i64,
    pub group_id: i64,
    pub song_name: String,
    pub text: String,
    /// `YYYY-MM-DD`, or empty to clear
    pub release_date: String,
    pub link: String,
}

pub fn compile(req: &ReplaceRequest) -> Result<SongReplacement> {
    if req.id <= 0 {
        return Err(Error::Validation("Invalid song ID".to_string()));
    }

    let release_date = match req.release_date.trim() {
        "" => None,
        date => Some(parse_api_date("release_date", date)?),
    };

    Ok(SongReplacement {
        id: req.id,
        group_id: req.group_id,
        name: req.song_name.clone(),
        lyrics: non_empty(&req.text),
        release_date,
        link: non_empty(&req.link),
    })
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
