pub mod build;
pub mod config;
pub mod replace;
pub mod scan;
pub mod templates;

pub use build::{build_command, BuildArgs, BuildOutcome};
pub use config::{handle_config_command, ConfigCommand};
pub use replace::{replace, ReplaceArgs, ReplaceOutcome};
pub use scan::scan_document;
pub use templates::{fetch_template, list_templates, FetchOutcome, TemplatesCommand};

use crate::context::AppContext;
use crate::display;
use anyhow::{Context, Result};
use colored::*;
use frigg_fs::FileSystem;
use frigg_remote::HttpClient;
use std::path::Path;
use std::sync::Arc;

/// Run `replace` and report the outcome.
pub async fn handle_replace<F: FileSystem>(ctx: &mut AppContext<F>, args: &ReplaceArgs) -> Result<()> {
    match replace(ctx, args).await? {
        ReplaceOutcome::ParamsCreated { params_file, count } => {
            display::success(&format!(
                "Generated parameter file {} ({} parameters)",
                params_file.display(),
                count
            ));
            display::hint("Fill in the values, then run the command again.");
        }
        ReplaceOutcome::Rendered { text } => print!("{}", text),
        ReplaceOutcome::Written { path } => {
            display::success(&format!("Wrote {}", path.display()));
        }
        ReplaceOutcome::Cancelled => display::cancelled(),
    }
    Ok(())
}

/// Print the scanned table as JSON.
pub async fn handle_scan<F: FileSystem>(ctx: &AppContext<F>, document: &Path) -> Result<()> {
    let table = scan_document(ctx, document).await?;
    println!("{}", table.to_json_pretty()?);
    Ok(())
}

/// Run `build` and report the outcome.
pub async fn handle_build<F: FileSystem>(ctx: &mut AppContext<F>, args: &BuildArgs) -> Result<()> {
    match build_command(ctx, args).await? {
        BuildOutcome::RulesScaffolded { rule_file } => {
            display::success(&format!("Created empty rule file {}", rule_file.display()));
            display::hint("Add a Template and Rules, then run the command again.");
        }
        BuildOutcome::Printed { command } => println!("{}", command),
        BuildOutcome::Written { path } => {
            display::success(&format!("Wrote command to {}", path.display()));
        }
        BuildOutcome::Cancelled => display::cancelled(),
    }
    Ok(())
}

/// List or download templates over HTTP.
pub async fn handle_templates<F: FileSystem>(
    ctx: &mut AppContext<F>,
    cmd: TemplatesCommand,
) -> Result<()> {
    let client = Arc::new(
        HttpClient::new(ctx.settings().fetch_timeout()).context("Failed to create HTTP client")?,
    );

    match cmd {
        TemplatesCommand::List => {
            let templates = list_templates(ctx, client).await?;
            if templates.is_empty() {
                println!("No templates found.");
            }
            for template in templates {
                println!("{}  {}", template.name.bold(), template.download_url.as_str().dimmed());
            }
        }
        TemplatesCommand::Fetch { name, to } => match fetch_template(ctx, client, &name, to).await? {
            FetchOutcome::Saved {
                path,
                templates_folder_updated,
            } => {
                display::success(&format!("Saved template to {}", path.display()));
                if templates_folder_updated {
                    display::hint(&format!(
                        "templates_folder is now {}",
                        ctx.settings().templates_folder
                    ));
                }
            }
            FetchOutcome::Cancelled => display::cancelled(),
        },
    }
    Ok(())
}
