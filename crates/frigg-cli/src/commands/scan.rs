use crate::context::AppContext;
use anyhow::{Context, Result};
use frigg_core::{scan, ParamTable};
use frigg_fs::FileSystem;
use std::path::Path;

/// Placeholders found in `document`, without touching any parameter file.
pub async fn scan_document<F: FileSystem>(
    ctx: &AppContext<F>,
    document: &Path,
) -> Result<ParamTable> {
    let text = ctx
        .fs
        .read_to_string(document)
        .await
        .with_context(|| format!("Failed to read {}", document.display()))?;

    Ok(scan(&text, &ctx.token_pattern()))
}
