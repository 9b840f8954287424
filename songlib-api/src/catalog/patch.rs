//! Partial song updates
//!
//! A [`PatchRequest`] compiles into an [`UpdateSet`]: a map from column to
//! new value holding only the fields the caller supplied. An empty string or
//! a zero id in the request is a real value and is written as such; only
//! absent fields are left alone.

use chrono::NaiveDate;
use songlib_common::dates::parse_api_date;
use songlib_common::db::Song;
use songlib_common::{Error, Result};
use std::collections::BTreeMap;

/// Patch against one song; `None` means "leave unchanged"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchRequest {
    pub song_id: i64,
    pub group_id: Option<i64>,
    pub name: Option<String>,
    pub lyrics: Option<String>,
    /// `YYYY-MM-DD`, parsed during compilation
    pub release_date: Option<String>,
    pub link: Option<String>,
}

/// Updatable song column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SongField {
    GroupId,
    Name,
    Lyrics,
    ReleaseDate,
    Link,
}

impl SongField {
    /// Column name in the `songs` table
    pub fn column(self) -> &'static str {
        match self {
            SongField::GroupId => "group_id",
            SongField::Name => "name",
            SongField::Lyrics => "lyrics",
            SongField::ReleaseDate => "release_date",
            SongField::Link => "link",
        }
    }

    /// Field name as clients spell it
    pub fn api_name(self) -> &'static str {
        match self {
            SongField::GroupId => "group_id",
            SongField::Name => "song_name",
            SongField::Lyrics => "text",
            SongField::ReleaseDate => "release_date",
            SongField::Link => "link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Date(NaiveDate),
}

/// Fields to write, keyed by column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSet {
    fields: BTreeMap<SongField, FieldValue>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the value for one field
    pub fn set(&mut self, field: SongField, value: FieldValue) {
        self.fields.insert(field, value);
    }

    pub fn get(&self, field: SongField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SongField, &FieldValue)> {
        self.fields.iter().map(|(f, v)| (*f, v))
    }

    /// Client-facing names of the fields this set touches
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.keys().map(|f| f.api_name()).collect()
    }

    /// Apply to an in-memory song exactly as the store would
    ///
    /// `group_name` is not touched; it is derived from the group row.
    pub fn apply_to(&self, song: &mut Song) {
        for (field, value) in self.iter() {
            match (field, value) {
                (SongField::GroupId, FieldValue::Integer(id)) => song.group_id = *id,
                (SongField::Name, FieldValue::Text(name)) => song.name = name.clone(),
                (SongField::Lyrics, FieldValue::Text(text)) => song.lyrics = Some(text.clone()),
                (SongField::ReleaseDate, FieldValue::Date(date)) => song.release_date = Some(*date),
                (SongField::Link, FieldValue::Text(link)) => song.link = Some(link.clone()),
                _ => {}
            }
        }
    }
}

/// Compiled patch ready for the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPatch {
    pub song_id: i64,
    pub updates: UpdateSet,
}

/// Compile a patch request
///
/// Any invalid field aborts the whole patch: nothing is returned to apply.
pub fn compile(req: &PatchRequest) -> Result<CompiledPatch> {
    if req.song_id <= 0 {
        return Err(Error::Validation("Invalid song ID".to_string()));
    }

    let mut updates = UpdateSet::new();

    if let Some(group_id) = req.group_id {
        updates.set(SongField::GroupId, FieldValue::Integer(group_id));
    }
    if let Some(name) = &req.name {
        updates.set(SongField::Name, FieldValue::Text(name.clone()));
    }
    if let Some(lyrics) = &req.lyrics {
        updates.set(SongField::Lyrics, FieldValue::Text(lyrics.clone()));
    }
    if let Some(date) = &req.release_date {
        let date = parse_api_date(SongField::ReleaseDate.api_name(), date)?;
        updates.set(SongField::ReleaseDate, FieldValue::Date(date));
    }
    if let Some(link) = &req.link {
        updates.set(SongField::Link, FieldValue::Text(link.clone()));
    }

    Ok(CompiledPatch {
        song_id: req.song_id,
        updates,
    })
}
