use crate::context::AppContext;
use anyhow::{Context, Result};
use clap::Args;
use frigg_core::ParamTable;
use frigg_fs::FileSystem;
use frigg_rule_engine::{default_command_path, default_rule_file, RuleLoader};
use std::path::{Path, PathBuf};

/// `--output -` prints the command instead of writing a file.
pub const STDOUT_MARKER: &str = "-";

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Parameter file (as written by `frigg replace`)
    pub params: PathBuf,

    /// Rule file to use instead of asking (scaffolded if missing)
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Where to write the command; `-` prints it
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The rule file did not exist; an empty one was created.
    RulesScaffolded { rule_file: PathBuf },
    /// The command, for stdout.
    Printed { command: String },
    /// The command was written to `path`.
    Written { path: PathBuf },
    Cancelled,
}

/// Render a parameter file through a rule file into a command.
pub async fn build_command<F: FileSystem>(
    ctx: &mut AppContext<F>,
    args: &BuildArgs,
) -> Result<BuildOutcome> {
    let params_file = &args.params;
    let contents = ctx
        .fs
        .read_to_string(params_file)
        .await
        .with_context(|| format!("Failed to read {}", params_file.display()))?;
    let table = ParamTable::from_json(&contents)
        .with_context(|| format!("{} is not a valid parameter file", params_file.display()))?;

    let loader = RuleLoader::new(ctx.fs.clone());
    let rule_file = match &args.rules {
        Some(path) => path.clone(),
        None => match choose_rule_file(ctx, &loader, params_file).await? {
            Some(path) => path,
            None => return Ok(BuildOutcome::Cancelled),
        },
    };

    let Some(builder) = loader
        .load(&rule_file)
        .await
        .with_context(|| format!("Can't parse rule file {}", rule_file.display()))?
    else {
        loader.scaffold(&rule_file).await?;
        return Ok(BuildOutcome::RulesScaffolded { rule_file });
    };

    let command = builder
        .render(&table)
        .with_context(|| format!("Can't apply rule file {}", rule_file.display()))?;

    ctx.session.remember_rule_file(params_file, &rule_file);
    ctx.persist_session().await?;

    let destination = match &args.output {
        Some(path) if path.as_os_str() == STDOUT_MARKER => {
            return Ok(BuildOutcome::Printed { command });
        }
        Some(path) => path.clone(),
        None => {
            let default = ctx
                .session
                .command_file_for(params_file)
                .map(PathBuf::from)
                .unwrap_or_else(|| default_command_path(params_file, &rule_file));
            let candidates = ctx.session.known_command_files();
            match ctx.choose("Write command to", &candidates, &default)? {
                Some(path) => path,
                None => return Ok(BuildOutcome::Cancelled),
            }
        }
    };

    ctx.fs
        .write(&destination, &command)
        .await
        .with_context(|| format!("Failed to write command file {}", destination.display()))?;

    ctx.session.remember_command_file(params_file, &destination);
    ctx.persist_session().await?;
    Ok(BuildOutcome::Written { path: destination })
}

/// Offer the remembered rule files and those in the templates folder.
async fn choose_rule_file<F: FileSystem>(
    ctx: &mut AppContext<F>,
    loader: &RuleLoader<F>,
    params_file: &Path,
) -> Result<Option<PathBuf>> {
    let folder = ctx.templates_folder();
    let default = default_rule_file(&ctx.session, params_file, &folder);

    let mut candidates = ctx.session.known_rule_files();
    for found in loader.discover_rule_files(&folder).await? {
        if !candidates.contains(&found) {
            candidates.push(found);
        }
    }

    Ok(ctx.choose("Rule file", &candidates, &default)?)
}
