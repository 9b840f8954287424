//! Catalog query and mutation engine
//!
//! - `filter`: listing requests compiled into predicates
//! - `patch`: partial updates compiled into update sets
//! - `verses`: lyric segmentation and verse paging
//! - `replace` / `insert`: full replacement and enriched insertion
//! - `repository` / `sqlite`: the store seam and its SQLite implementation
//! - `service`: deadline-bounded operations used by the HTTP handlers

pub mod filter;
pub mod insert;
pub mod patch;
pub mod replace;
pub mod repository;
pub mod service;
pub mod sqlite;
pub mod verses;

pub use filter::{FilterRequest, Predicate};
pub use insert::InsertRequest;
pub use patch::{PatchRequest, UpdateSet};
pub use replace::ReplaceRequest;
pub use repository::{CatalogRepository, NewSong, SongReplacement};
pub use service::CatalogService;
pub use sqlite::SqliteCatalog;
pub use verses::VersePage;
