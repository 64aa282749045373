//! Frigg CLI - fill placeholders in scripts and build commands from rule files.

use anyhow::{Context, Result};
use clap::Parser;
use frigg_cli::commands::{self, BuildArgs, ConfigCommand, ReplaceArgs, TemplatesCommand};
use frigg_cli::{AppContext, Chooser, DefaultChooser, PromptChooser};
use frigg_config::ConfigManager;
use frigg_fs::NativeFileSystem;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "frigg", version)]
#[command(about = "Fill @@placeholders@@ in scripts and build commands from rule files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Skip prompts and take the default file every time
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Configuration file path (default: ~/.frigg/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Substitute parameter values into a document
    ///
    /// The first run writes a parameter file next to the document; fill in
    /// its values and run again.
    Replace(ReplaceArgs),

    /// Print the placeholders found in a document as JSON
    Scan {
        /// Document containing @@placeholders@@
        document: PathBuf,
    },

    /// Build a command from a parameter file and a rule file
    Build(BuildArgs),

    /// List and download shared rule templates
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },

    /// Manage frigg configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_context(cli: &Cli) -> Result<AppContext<NativeFileSystem>> {
    let config = match &cli.config {
        Some(path) => ConfigManager::load_from(path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ConfigManager::load().await.context("Failed to load config")?,
    };

    let chooser: Box<dyn Chooser> = if cli.yes {
        Box::new(DefaultChooser)
    } else {
        Box::new(PromptChooser::new())
    };

    let ctx = AppContext::new(Arc::new(NativeFileSystem::new()), config, chooser);
    Ok(match ConfigManager::session_path() {
        Ok(path) => ctx.with_session_file(path).await,
        Err(e) => {
            tracing::warn!(error = %e, "session will not be remembered");
            ctx
        }
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Config { command } = &cli.command {
        return commands::handle_config_command(command.clone(), cli.config.clone());
    }

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(async {
        let mut ctx = load_context(&cli).await?;
        match &cli.command {
            Command::Replace(args) => commands::handle_replace(&mut ctx, args).await,
            Command::Scan { document } => commands::handle_scan(&ctx, document).await,
            Command::Build(args) => commands::handle_build(&mut ctx, args).await,
            Command::Templates { command } => {
                commands::handle_templates(&mut ctx, command.clone()).await
            }
            Command::Config { .. } => Ok(()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_replace_to_file_without_path() {
        let cli = Cli::parse_from(["frigg", "replace", "run.usql", "--to-file"]);
        let Command::Replace(args) = cli.command else {
            panic!("expected replace");
        };
        assert_eq!(args.document, PathBuf::from("run.usql"));
        assert_eq!(args.to_file, Some(None));
    }

    #[test]
    fn test_cli_parsing_replace_to_file_with_path() {
        let cli = Cli::parse_from(["frigg", "replace", "run.usql", "--to-file", "out.usql"]);
        let Command::Replace(args) = cli.command else {
            panic!("expected replace");
        };
        assert_eq!(args.to_file, Some(Some(PathBuf::from("out.usql"))));
    }

    #[test]
    fn test_cli_parsing_build_with_global_flags() {
        let cli = Cli::parse_from([
            "frigg", "build", "run.usql.json", "--rules", "adla.json", "-o", "-", "--yes", "-vv",
        ]);
        assert!(cli.yes);
        assert_eq!(cli.verbose, 2);
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.rules, Some(PathBuf::from("adla.json")));
        assert_eq!(args.output, Some(PathBuf::from("-")));
    }

    #[test]
    fn test_cli_parsing_templates_fetch() {
        let cli = Cli::parse_from(["frigg", "templates", "fetch", "adla.json", "--to", "/t/a.json"]);
        assert!(matches!(
            cli.command,
            Command::Templates {
                command: TemplatesCommand::Fetch { .. }
            }
        ));
    }

    #[test]
    fn test_cli_parsing_config_init_force() {
        let cli = Cli::parse_from(["frigg", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Command::Config {
                command: ConfigCommand::Init { force: true }
            }
        ));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
