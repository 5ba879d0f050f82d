//! # Command Line Interface
//!
//! `hemlis` resolves secrets through a [`SecretManager`] from the shell. Values
//! go to stdout; logs go to stderr.

pub mod output;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::ManagerConfig;
use crate::observability::{init_logging, log_config_info};
use crate::secrets::{EnvSecretSource, NameNormalization, SecretManager, SecretSource};
use output::{render_json, render_lines, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "hemlis")]
#[command(about = "Cached secret lookups against a remote secret service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Where secrets come from
    #[arg(long, value_enum, default_value_t = SourceKind::Http, global = true)]
    pub source: SourceKind,

    /// Variable prefix for the env source
    #[arg(long, default_value = crate::secrets::env::DEFAULT_SECRET_PREFIX, global = true)]
    pub env_prefix: String,

    /// Organization id for the env source (the http source reads BWS_ORGANIZATION_ID)
    #[arg(long, default_value = "local", global = true)]
    pub organization: String,

    /// Name normalization override (none, lowercase, uppercase)
    #[arg(long, global = true)]
    pub normalization: Option<NameNormalization>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Remote secrets REST API configured through BWS_* variables
    Http,
    /// Prefixed environment variables (development only)
    Env,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a secret value
    Get(GetArgs),

    /// List indexed secret names
    Names {
        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Rebuild the identifier index and reload every value
    Refresh,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Secret name
    #[arg(required_unless_present = "id", conflicts_with = "id")]
    pub name: Option<String>,

    /// Look up by remote identifier instead of name
    #[arg(long)]
    pub id: Option<String>,
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(if cli.verbose { "debug" } else { "warn" }, cli.json_logs)?;

    let output = match cli.source {
        SourceKind::Http => {
            let mut config = ManagerConfig::from_env()?;
            if let Some(normalization) = cli.normalization {
                config.name_normalization = normalization;
            }
            log_config_info(&config);
            let manager = SecretManager::new(config).await.context("Failed to start secret manager")?;
            execute(&manager, cli.command).await?
        }
        SourceKind::Env => {
            let config = ManagerConfig::new("unused", cli.organization)
                .with_name_normalization(cli.normalization.unwrap_or_default());
            let source = EnvSecretSource::with_prefix(cli.env_prefix);
            let manager = SecretManager::with_source(config, source)
                .await
                .context("Failed to start secret manager")?;
            execute(&manager, cli.command).await?
        }
    };

    println!("{}", output);
    Ok(())
}

/// Run one command against a ready manager and return what should be printed
pub async fn execute<S: SecretSource>(
    manager: &SecretManager<S>,
    command: Commands,
) -> anyhow::Result<String> {
    match command {
        Commands::Get(GetArgs { id: Some(id), .. }) => {
            let value = manager.get_secret_by_id(&id).await?;
            Ok(value.into_inner())
        }
        Commands::Get(GetArgs { name: Some(name), .. }) => {
            let value = manager.get_secret_by_name(&name).await?;
            Ok(value.into_inner())
        }
        Commands::Get(GetArgs { name: None, id: None }) => {
            anyhow::bail!("Either a secret name or --id is required")
        }
        Commands::Names { output } => render_lines(&manager.indexed_names().await, output),
        Commands::Refresh => {
            let indexed = manager.refresh_index().await?;
            let cached = manager.refresh_cache().await?;
            render_json(&serde_json::json!({ "indexed": indexed, "cached": cached }))
        }
    }
}
