//! Metadata enricher client
//!
//! Looks up release date, lyrics and a reference link for a newly added song:
//! `GET {base_url}/info?group=<group>&song=<song>` returning
//! `{"releaseDate": "DD.MM.YYYY", "text": "...", "link": "..."}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("songlib/", env!("CARGO_PKG_VERSION"));

/// Enricher client errors
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<EnrichError> for songlib_common::Error {
    fn from(err: EnrichError) -> Self {
        match err {
            EnrichError::Timeout => {
                songlib_common::Error::Unavailable("Metadata service timed out".to_string())
            }
            other => songlib_common::Error::Upstream(other.to_string()),
        }
    }
}

/// Details returned for one song
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SongDetails {
    /// Release date in `DD.MM.YYYY` format
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// External metadata lookup
#[async_trait]
pub trait MetadataEnricher: Send + Sync {
    async fn lookup(&self, group: &str, song: &str) -> Result<SongDetails, EnrichError>;
}

/// reqwest-based enricher
pub struct HttpEnricher {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpEnricher {
    /// `timeout` bounds each request end to end
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, EnrichError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| EnrichError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MetadataEnricher for HttpEnricher {
    async fn lookup(&self, group: &str, song: &str) -> Result<SongDetails, EnrichError> {
        let url = format!("{}/info", self.base_url);

        tracing::debug!(url = %url, group = %group, song = %song, "Querying metadata service");

        let response = self
            .http_client
            .get(&url)
            .query(&[("group", group), ("song", song)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichError::Timeout
                } else {
                    EnrichError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EnrichError::ApiError(status.as_u16(), error_text));
        }

        let details: SongDetails = response
            .json()
            .await
            .map_err(|e| EnrichError::ParseError(e.to_string()))?;

        tracing::debug!(
            group = %group,
            song = %song,
            release_date = %details.release_date,
            link = %details.link,
            "Retrieved song details from metadata service"
        );

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songlib_common::Error;

    #[test]
    fn test_client_creation_strips_trailing_slash() {
        let client = HttpEnricher::new("http://localhost:9000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_details_use_camel_case_date_key() {
        let details: SongDetails = serde_json::from_str(
            r#"{"releaseDate":"16.07.2006","text":"Ooh baby","link":"https://example.com"}"#,
        )
        .unwrap();
        assert_eq!(details.release_date, "16.07.2006");
    }

    #[test]
    fn test_missing_field_fails_to_parse() {
        let parsed = serde_json::from_str::<SongDetails>(r#"{"text":"x","link":"y"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_error_classification() {
        assert!(matches!(Error::from(EnrichError::Timeout), Error::Unavailable(_)));
        assert!(matches!(
            Error::from(EnrichError::ApiError(500, "boom".to_string())),
            Error::Upstream(_)
        ));
        assert!(matches!(
            Error::from(EnrichError::ParseError("bad".to_string())),
            Error::Upstream(_)
        ));
    }
}
