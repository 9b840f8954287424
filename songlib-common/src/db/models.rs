//! Database models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Performing act; songs reference it by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

/// Song row joined with its group name
///
/// Serialized with the field names clients already use
/// (`song_name`, `text`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub group_id: i64,
    pub group_name: String,
    #[serde(rename = "song_name")]
    pub name: String,
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "text")]
    pub lyrics: Option<String>,
    pub link: Option<String>,
}
