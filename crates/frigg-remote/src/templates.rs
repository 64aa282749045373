//! Listing and downloading shared rule templates
//!
//! Templates are published as files in a GitHub repository folder. The
//! folder's contents API URL returns a JSON array of entries; every entry of
//! type `file` is offered as a template.

use crate::client::Fetcher;
use crate::error::{parse_url, Error, Result};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

/// One downloadable template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub name: String,
    pub download_url: Url,
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    download_url: Option<String>,
}

/// Parse a GitHub contents listing into templates.
///
/// Directories and entries without a download URL are skipped.
pub fn parse_listing(body: &[u8]) -> Result<Vec<TemplateEntry>> {
    let entries: Vec<ListingEntry> = serde_json::from_slice(body)?;

    entries
        .into_iter()
        .filter(|entry| entry.kind == "file")
        .filter_map(|entry| {
            let download_url = entry.download_url?;
            Some(parse_url(&download_url).map(|download_url| TemplateEntry {
                name: entry.name,
                download_url,
            }))
        })
        .collect()
}

/// A templates folder reachable through a [`Fetcher`]
pub struct TemplateIndex<F: Fetcher> {
    fetcher: Arc<F>,
    index_url: Url,
}

impl<F: Fetcher> TemplateIndex<F> {
    /// `index_url` must be an http(s) URL.
    pub fn new(fetcher: Arc<F>, index_url: &str) -> Result<Self> {
        Ok(Self {
            fetcher,
            index_url: parse_url(index_url)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.index_url
    }

    /// All templates in the folder, in listing order.
    pub async fn list(&self) -> Result<Vec<TemplateEntry>> {
        let body = self.fetcher.fetch(&self.index_url).await?;
        let templates = parse_listing(&body)?;
        tracing::debug!(url = %self.index_url, count = templates.len(), "listed templates");
        Ok(templates)
    }

    /// Download the template called `name`.
    pub async fn fetch_template(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .list()
            .await?
            .into_iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))?;

        self.fetcher.fetch(&entry.download_url).await
    }
}
