//! Clients for external services

pub mod enricher;

pub use enricher::{EnrichError, HttpEnricher, MetadataEnricher, SongDetails};
