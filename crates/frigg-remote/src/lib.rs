//! Rule template downloads for frigg
//!
//! Shared rule files live in a folder of a GitHub repository. This crate
//! lists that folder through the GitHub contents API and downloads single
//! files from it.
//!
//! # Example
//!
//! ```no_run
//! use frigg_remote::{HttpClient, TemplateIndex};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(HttpClient::new(Duration::from_secs(30))?);
//!     let index = TemplateIndex::new(
//!         client,
//!         "https://api.github.com/repos/owner/repo/contents/templates",
//!     )?;
//!
//!     for template in index.list().await? {
//!         println!("{}", template.name);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod templates;

pub use client::{Fetcher, HttpClient};
pub use error::{parse_url, Error, Result};
pub use templates::{parse_listing, TemplateEntry, TemplateIndex};
