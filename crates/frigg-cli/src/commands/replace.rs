use crate::context::AppContext;
use anyhow::{Context, Result};
use clap::Args;
use frigg_core::{local_output_path, merge, render_document, scan, sidecar_path, ParamStore};
use frigg_fs::FileSystem;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ReplaceArgs {
    /// Document containing @@placeholders@@
    pub document: PathBuf,

    /// Parameter file to use instead of asking (created if missing)
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    ///
    /// Without PATH the file goes next to the document as <name>.local.<ext>.
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub to_file: Option<Option<PathBuf>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// No parameter file existed; one was written for the user to fill in.
    ParamsCreated { params_file: PathBuf, count: usize },
    /// The replaced document, for stdout.
    Rendered { text: String },
    /// The replaced document was written to `path`.
    Written { path: PathBuf },
    Cancelled,
}

/// Scan the document, reconcile with its parameter file and substitute.
pub async fn replace<F: FileSystem>(
    ctx: &mut AppContext<F>,
    args: &ReplaceArgs,
) -> Result<ReplaceOutcome> {
    let document = &args.document;
    let text = ctx
        .fs
        .read_to_string(document)
        .await
        .with_context(|| format!("Failed to read {}", document.display()))?;

    let scanned = scan(&text, &ctx.token_pattern());
    tracing::info!(document = %document.display(), count = scanned.len(), "scanned document");

    let store = ParamStore::new(ctx.fs.clone());
    let params_file = match &args.params {
        Some(path) => path.clone(),
        None => {
            let sidecar = sidecar_path(document);
            let default = ctx
                .session
                .params_file_for(document)
                .map(PathBuf::from)
                .unwrap_or_else(|| sidecar.clone());
            let mut candidates = store.discover_candidates(&sidecar).await?;
            if default != sidecar {
                candidates.insert(0, sidecar);
            }

            let prompt = format!("Parameter file for {}", document.display());
            match ctx.choose(&prompt, &candidates, &default)? {
                Some(path) => path,
                None => return Ok(ReplaceOutcome::Cancelled),
            }
        }
    };

    let delete_missing = ctx.settings().delete_missing_params;
    let Some(table) = store.update(&scanned, &params_file, delete_missing).await? else {
        store.save(&scanned, &params_file).await?;
        ctx.session.remember_params_file(document, &params_file);
        ctx.persist_session().await?;
        return Ok(ReplaceOutcome::ParamsCreated {
            params_file,
            count: scanned.len(),
        });
    };

    store.save(&table, &params_file).await?;
    ctx.session.remember_params_file(document, &params_file);
    ctx.persist_session().await?;

    let rendered = render_document(&text, &table, document, Some(&params_file));

    let destination = match &args.to_file {
        None => return Ok(ReplaceOutcome::Rendered { text: rendered }),
        Some(Some(path)) => path.clone(),
        Some(None) => {
            let default = local_output_path(document);
            match ctx.choose("Save replaced document to", &[], &default)? {
                Some(path) => path,
                None => return Ok(ReplaceOutcome::Cancelled),
            }
        }
    };

    ctx.fs
        .write(&destination, &rendered)
        .await
        .with_context(|| format!("Failed to write {}", destination.display()))?;
    Ok(ReplaceOutcome::Written { path: destination })
}
