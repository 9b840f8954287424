//! Release date formats
//!
//! Clients exchange dates as `YYYY-MM-DD`; the metadata enricher reports
//! them as `DD.MM.YYYY`.

use chrono::NaiveDate;

use crate::{Error, Result};

/// Format used by the HTTP API and the store
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format returned by the metadata enricher
pub const ENRICHER_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a client-supplied `YYYY-MM-DD` date
///
/// `field` names the offending input in the validation message.
pub fn parse_api_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), API_DATE_FORMAT).map_err(|_| {
        Error::Validation(format!(
            "Invalid date format for {}, use YYYY-MM-DD",
            field
        ))
    })
}

/// Parse an enricher `DD.MM.YYYY` date
///
/// A bad value means the upstream payload is malformed.
pub fn parse_enricher_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ENRICHER_DATE_FORMAT).map_err(|_| {
        Error::Upstream(format!(
            "Metadata service returned malformed release date '{}'",
            value
        ))
    })
}
