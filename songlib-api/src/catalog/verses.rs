//! Verse segmentation and paging
//!
//! Lyrics are split into verses at blank lines (one or more lines that are
//! empty or whitespace-only). Line breaks inside a verse are preserved;
//! leading and trailing blank lines produce no verses.

use serde::Serialize;

/// Verses per page when the caller gives no usable limit
pub const DEFAULT_VERSE_LIMIT: usize = 10;

/// One page of a song's verses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersePage {
    pub id: i64,
    pub verses: Vec<String>,
}

/// Sanitized `(limit, offset)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseWindow {
    pub limit: usize,
    pub offset: usize,
}

impl VerseWindow {
    /// Apply defaults: a missing or non-positive limit becomes
    /// [`DEFAULT_VERSE_LIMIT`], a missing or negative offset becomes 0.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) if l > 0 => usize::try_from(l).unwrap_or(usize::MAX),
            _ => DEFAULT_VERSE_LIMIT,
        };
        let offset = match offset {
            Some(o) if o > 0 => usize::try_from(o).unwrap_or(usize::MAX),
            _ => 0,
        };
        Self { limit, offset }
    }
}

/// Split lyrics into ordered verses
pub fn split_verses(lyrics: &str) -> Vec<String> {
    let mut verses = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    // `lines()` also strips the `\r` of `\r\n` endings
    for line in lyrics.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                verses.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        verses.push(current.join("\n"));
    }

    verses
}

/// Verses `[offset, offset + limit)` of the given lyrics
///
/// Absent lyrics and offsets past the end both give an empty page.
pub fn page(lyrics: Option<&str>, limit: i64, offset: i64) -> Vec<String> {
    let window = VerseWindow::new(Some(limit), Some(offset));
    page_window(lyrics, window)
}

pub(crate) fn page_window(lyrics: Option<&str>, window: VerseWindow) -> Vec<String> {
    match lyrics {
        Some(text) => split_verses(text)
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .collect(),
        None => Vec::new(),
    }
}
