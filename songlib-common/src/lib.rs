//! # Songlib Common Library
//!
//! Shared code for the song catalog service:
//! - Error taxonomy shared by the catalog core and the HTTP layer
//! - Configuration model and TOML loading
//! - Release date formats
//! - Database bootstrap and persisted models

pub mod config;
pub mod dates;
pub mod db;
pub mod error;

pub use error::{Error, Result};
