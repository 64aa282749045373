//! Error types for frigg-remote

use thiserror::Error;

/// Result type alias for frigg-remote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for frigg-remote operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request did not complete in time
    #[error("Request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// Server answered with a non-success status
    #[error("HTTP request failed with status {status}: {url}")]
    Status { status: u16, url: String },

    /// JSON deserialization failed
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// URL with a scheme other than http or https
    #[error("Unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    /// Template not present in the listing
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),
}

/// Parse `raw` and require an http(s) scheme.
pub fn parse_url(raw: &str) -> Result<url::Url> {
    let url = url::Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::UnsupportedScheme(other.to_string())),
    }
}
