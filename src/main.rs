//! Plano Editor
//!
//! Interactive network-topology editor over building floor plans.
//!
//! This is the main entry point for the Dioxus Desktop application.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use plano_ui::AppConfig;
use tracing_subscriber::EnvFilter;

/// Command-line arguments; flags win over the config file and environment
#[derive(Debug, Parser)]
#[command(name = "plano-editor", version, about = "Network topology editor over floor plans")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend origin, e.g. http://127.0.0.1:8000
    #[arg(long, env = "PLANO_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Plano opened at startup
    #[arg(long, env = "PLANO_NAME", value_name = "NAME")]
    plano: Option<String>,

    /// Log filter directive, e.g. "plano_editor=debug,info"
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    // clap already folds PLANO_API_URL / PLANO_NAME into the flags
    config.apply_overrides(args.api_url, args.plano);
    if let Some(filter) = args.log_filter {
        config.log.filter = filter;
    }

    init_logging(&config.log.filter)?;
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        "Backend {} | plano '{}'",
        config.api.base_url,
        config.editor.default_plano
    );

    plano_ui::launch(config).context("Failed to start the editor")?;
    Ok(())
}

/// `RUST_LOG` wins over the configured filter
fn init_logging(configured: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .pretty()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}
