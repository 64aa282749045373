//! Frigg Core - placeholder parameters and their persistence.
//!
//! This crate holds the document side of frigg:
//!
//! - [`scan`]: find placeholder tokens (`@@Name@@`) in document text
//! - [`ParamTable`] / [`Param`]: the token → `(name, value, type)` table
//! - [`ParamStore`] and [`merge`]: load, save and reconcile sidecar files
//! - [`render_document`]: substitute values back into the document
//! - [`Session`]: remembered file choices per document
//!
//! # Example
//!
//! ```no_run
//! use frigg_core::{merge, scan, sidecar_path, ParamStore, TokenPattern};
//! use frigg_fs::NativeFileSystem;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn run() -> frigg_core::Result<()> {
//! let document = Path::new("query.usql");
//! let text = std::fs::read_to_string(document)?;
//! let scanned = scan(&text, &TokenPattern::default());
//!
//! let store = ParamStore::new(Arc::new(NativeFileSystem::new()));
//! let params_file = sidecar_path(document);
//! let table = match store.load(&params_file).await? {
//!     Some(saved) => merge(&scanned, &saved, true),
//!     None => scanned,
//! };
//! store.save(&table, &params_file).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod params;
pub mod replace;
pub mod scanner;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use params::{Param, ParamTable};
pub use replace::{local_output_path, render_document, EMPTY_VALUE_MARKER};
pub use scanner::{scan, PatternWarning, TokenPattern, DEFAULT_PARAMETER_PATTERN};
pub use session::{DocumentFiles, Session};
pub use store::{merge, sidecar_path, ParamStore};
