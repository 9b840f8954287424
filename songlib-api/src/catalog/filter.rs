//! Song listing filters
//!
//! A [`FilterRequest`] compiles into a [`Predicate`]: a conjunction of
//! clauses, one per supplied field. Fields that are absent contribute no
//! clause at all, so they never narrow the result set.
//!
//! Substring clauses are case-insensitive for ASCII letters and match the
//! needle literally (`%` and `_` are not wildcards).

use chrono::NaiveDate;
use serde::Deserialize;
use songlib_common::dates::parse_api_date;
use songlib_common::db::Song;
use songlib_common::Result;

/// Body of `POST /songs/filter`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterRequest {
    /// Substring of the group name
    pub group: Option<String>,
    /// Substring of the song name
    pub song: Option<String>,
    /// Exact release date, `YYYY-MM-DD`
    pub release_date: Option<String>,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Single constraint on a song row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    GroupNameContains(String),
    SongNameContains(String),
    ReleasedOn(NaiveDate),
}

impl Clause {
    fn matches(&self, song: &Song) -> bool {
        match self {
            Clause::GroupNameContains(needle) => contains_ignore_ascii_case(&song.group_name, needle),
            Clause::SongNameContains(needle) => contains_ignore_ascii_case(&song.name, needle),
            Clause::ReleasedOn(date) => song.release_date == Some(*date),
        }
    }
}

/// Conjunction of clauses; no clauses matches every song
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// Predicate that matches everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Evaluate in memory with the same semantics the store applies
    pub fn matches(&self, song: &Song) -> bool {
        self.clauses.iter().all(|c| c.matches(song))
    }
}

/// Predicate plus the caller's paging parameters, passed through untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    pub predicate: Predicate,
    pub limit: i64,
    pub offset: i64,
}

/// Compile a filter request
///
/// A malformed release date fails the whole compilation.
pub fn compile(req: &FilterRequest) -> Result<CompiledFilter> {
    let mut predicate = Predicate::all();

    if let Some(group) = supplied(&req.group) {
        predicate = predicate.and(Clause::GroupNameContains(group.to_string()));
    }
    if let Some(song) = supplied(&req.song) {
        predicate = predicate.and(Clause::SongNameContains(song.to_string()));
    }
    if let Some(date) = supplied(&req.release_date) {
        predicate = predicate.and(Clause::ReleasedOn(parse_api_date("release_date", date)?));
    }

    Ok(CompiledFilter {
        predicate,
        limit: req.limit,
        offset: req.offset,
    })
}

/// An empty string carries no constraint, same as an absent field
fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}
