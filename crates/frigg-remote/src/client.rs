//! HTTP client wrapper with an explicit timeout

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use std::env;
use std::time::Duration;
use url::Url;

/// Anything that can fetch the body of a URL
///
/// The CLI uses [`HttpClient`]; tests substitute canned responses.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// HTTP client wrapper for template downloads
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client whose requests fail after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("frigg/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GitHub API headers; `GITHUB_TOKEN` raises the rate limit when set.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Ok(token) = env::var("GITHUB_TOKEN") {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("ignoring GITHUB_TOKEN: not a valid header value"),
            }
        }
        headers
    }

    fn map_error(&self, url: &Url, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            Error::Http(e)
        }
    }

    /// Make a GET request and return the response body
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| self.map_error(url, e))?;

        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.map_error(url, e))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        self.get_bytes(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_keeps_timeout() {
        let client = HttpClient::new(Duration::from_secs(7)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(7));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_github_listing() {
        let client = HttpClient::new(Duration::from_secs(30)).unwrap();
        let url = Url::parse("https://api.github.com/repos/rust-lang/rust/contents/").unwrap();
        let body = client.fetch(&url).await.unwrap();
        assert!(!body.is_empty());
    }
}
