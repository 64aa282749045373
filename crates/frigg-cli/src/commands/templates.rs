use crate::context::AppContext;
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use frigg_fs::FileSystem;
use frigg_remote::{Fetcher, TemplateEntry, TemplateIndex};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Subcommand, Debug, Clone)]
pub enum TemplatesCommand {
    /// List rule templates available at templates_url
    List,

    /// Download a rule template
    Fetch {
        /// Template file name as shown by `frigg templates list`
        name: String,

        /// Where to save it (default: <templates_folder>/<name>)
        #[arg(long, value_name = "PATH")]
        to: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Saved {
        path: PathBuf,
        /// Set when the templates folder setting moved to the save location.
        templates_folder_updated: bool,
    },
    Cancelled,
}

fn index<F: FileSystem, R: Fetcher>(
    ctx: &AppContext<F>,
    fetcher: Arc<R>,
) -> Result<TemplateIndex<R>> {
    let Some(url) = ctx.settings().templates_url.as_deref() else {
        bail!(
            "No templates_url set. Add it to the [settings] table of {}",
            ctx.config.path().display()
        );
    };
    TemplateIndex::new(fetcher, url).with_context(|| format!("Invalid templates_url '{}'", url))
}

pub async fn list_templates<F: FileSystem, R: Fetcher>(
    ctx: &AppContext<F>,
    fetcher: Arc<R>,
) -> Result<Vec<TemplateEntry>> {
    let index = index(ctx, fetcher)?;
    index
        .list()
        .await
        .with_context(|| format!("Failed to list templates at {}", index.url()))
}

/// Download `name` into the templates folder (or `to`).
///
/// Saving somewhere else makes that folder the new templates folder, so the
/// next `frigg build` offers the file.
pub async fn fetch_template<F: FileSystem, R: Fetcher>(
    ctx: &mut AppContext<F>,
    fetcher: Arc<R>,
    name: &str,
    to: Option<PathBuf>,
) -> Result<FetchOutcome> {
    let index = index(ctx, fetcher)?;
    let body = index
        .fetch_template(name)
        .await
        .with_context(|| format!("Failed to download template '{}'", name))?;

    let folder = ctx.templates_folder();
    let destination = match to {
        Some(path) => path,
        None => match ctx.choose("Save template to", &[], &folder.join(name))? {
            Some(path) => path,
            None => return Ok(FetchOutcome::Cancelled),
        },
    };

    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from);
    if let Some(parent) = &parent {
        ctx.fs.create_dir_all(parent).await?;
    }
    ctx.fs
        .write_bytes(&destination, &body)
        .await
        .with_context(|| format!("Failed to write {}", destination.display()))?;

    let mut templates_folder_updated = false;
    if let Some(parent) = parent {
        if parent != folder {
            ctx.config.config_mut().settings.templates_folder = parent.display().to_string();
            ctx.config
                .save()
                .await
                .context("Failed to update templates_folder in config")?;
            templates_folder_updated = true;
        }
    }

    Ok(FetchOutcome::Saved {
        path: destination,
        templates_folder_updated,
    })
}
