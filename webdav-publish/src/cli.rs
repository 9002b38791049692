///
/// This module implements the CLI interface for webdav-publish: command parsing, dispatch to
/// handlers, and the user-visible output of each command.
///
/// The publish pipeline itself (resolution, remote paths, collection creation, upload) lives in the
/// [`webdav-publish-core`] crate. This module is glue: it loads config, validates it, wires the
/// reqwest client into the core and serialises results.
///
/// ## Commands
/// - `publish`: publish one artifact plan and write `{"metadata": {...}}`.
/// - `validate`: report field-level config problems as JSON.
/// - `metadata`: describe the accepted store/plan fields as JSON.
///
/// For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`webdav-publish-core`]: ../../webdav-publish-core/
use crate::load_config::load_config;
use crate::upload::WebDavHttpClient;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use webdav_publish_core::config::{
    plan_config_metadata, store_config_metadata, validate_plan, validate_store, ValidationError,
};
use webdav_publish_core::console::TracingConsole;
use webdav_publish_core::{publish, PublishRequest};

/// CLI for webdav-publish: push CI build artifacts to a WebDAV artifact store.
#[derive(Parser)]
#[clap(
    name = "webdav-publish",
    version,
    about = "Publish CI build artifacts (files or glob matches) to a WebDAV artifact store"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish the artifact plan in the given config file
    Publish {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Directory the source specification is resolved against (defaults to the current directory)
        #[clap(long)]
        working_dir: Option<PathBuf>,
        /// Write the metadata JSON here instead of stdout
        #[clap(long)]
        metadata_out: Option<PathBuf>,
    },
    /// Validate the store and plan sections of the given config file
    Validate {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Print the accepted store and plan configuration fields
    Metadata,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Publish { .. } => "publish",
            Commands::Validate { .. } => "validate",
            Commands::Metadata => "metadata",
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!(command = cli.command.name(), "Dispatching command");

    match cli.command {
        Commands::Publish {
            config,
            working_dir,
            metadata_out,
        } => run_publish(config, working_dir, metadata_out).await,
        Commands::Validate { config } => run_validate(config),
        Commands::Metadata => run_metadata(),
    }
}

async fn run_publish(
    config: PathBuf,
    working_dir: Option<PathBuf>,
    metadata_out: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config)?;

    let errors = config_errors(&config);
    if !errors.is_empty() {
        let summary = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::error!(command = "publish", errors = errors.len(), "Configuration is invalid");
        anyhow::bail!("Invalid configuration: {summary}");
    }

    let working_dir = match working_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine the working directory")?,
    };
    let request = PublishRequest::from_configs(working_dir, &config.store, &config.plan);
    let client = WebDavHttpClient::new(&config.store)
        .map_err(|e| anyhow::anyhow!("Failed to construct WebDAV client: {e}"))?;

    tracing::info!(command = "publish", source = %request.source, "Starting publish");
    let report = match publish(&client, &TracingConsole, &request).await {
        Ok(report) => {
            tracing::info!(command = "publish", files = report.outcomes.len(), "Publish complete");
            report
        }
        Err(e) => {
            tracing::error!(command = "publish", error = %e, "Publish failed");
            return Err(anyhow::Error::new(e));
        }
    };

    let body = serde_json::to_string_pretty(&json!({ "metadata": report.metadata }))?;
    match metadata_out {
        Some(path) => std::fs::write(&path, body)
            .with_context(|| format!("Failed to write metadata to {}", path.display()))?,
        None => println!("{body}"),
    }
    Ok(())
}

fn run_validate(config: PathBuf) -> Result<()> {
    let config = load_config(config)?;
    let errors = config_errors(&config);
    println!("{}", serde_json::to_string_pretty(&errors)?);
    if errors.is_empty() {
        tracing::info!(command = "validate", "Configuration is valid");
        Ok(())
    } else {
        tracing::error!(command = "validate", errors = errors.len(), "Configuration is invalid");
        anyhow::bail!("Configuration has {} invalid field(s)", errors.len())
    }
}

fn run_metadata() -> Result<()> {
    let body = json!({
        "store": store_config_metadata(),
        "plan": plan_config_metadata(),
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn config_errors(config: &crate::load_config::PublishConfig) -> Vec<ValidationError> {
    let mut errors = validate_store(&config.store);
    errors.extend(validate_plan(&config.plan));
    errors
}
