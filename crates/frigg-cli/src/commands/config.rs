use anyhow::{Context, Result};
use clap::Subcommand;
use frigg_config::ConfigManager;
use frigg_fs::NativeFileSystem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Initialize config file at ~/.frigg/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show config file path
    Path,

    /// Print the effective configuration
    Show,
}

pub fn handle_config_command(cmd: ConfigCommand, config_path: Option<PathBuf>) -> Result<()> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let config_path = match config_path {
        Some(path) => path,
        None => ConfigManager::config_path()?,
    };

    runtime.block_on(async {
        match cmd {
            ConfigCommand::Init { force } => init_config(&config_path, force).await,
            ConfigCommand::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
            ConfigCommand::Show => show_config(&config_path).await,
        }
    })
}

async fn init_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        println!("Config already exists at: {}", config_path.display());
        println!("To reinitialize, pass --force.");
        return Ok(());
    }

    ConfigManager::init_at(config_path).await?;
    println!("✓ Initialized config at: {}", config_path.display());
    Ok(())
}

async fn show_config(config_path: &Path) -> Result<()> {
    let manager = if config_path.exists() {
        ConfigManager::load_from(config_path).await?
    } else {
        println!("# {} does not exist; showing defaults", config_path.display());
        ConfigManager::load_or_default_with_filesystem(
            Arc::new(NativeFileSystem::new()),
            config_path,
        )
        .await?
    };

    print!("{}", manager.config().to_toml_string()?);
    Ok(())
}
