#![deny(unsafe_code)]

//! SafeCite CLI: MCP stdio server and one-shot tool runner.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use safecite_config::AppConfig;

/// SafeCite: OSHA compliance answers for AI agents.
#[derive(Parser)]
#[command(name = "safecite", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "safecite.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the compliance tools over MCP on stdin/stdout.
    Serve,

    /// Check a workplace scenario.
    Check {
        /// Scenario text; multiple words are joined with spaces.
        #[arg(required = true)]
        scenario: Vec<String>,

        /// Always search the full manual.
        #[arg(long)]
        detailed: bool,
    },

    /// Look up a regulation by section number.
    Cite {
        /// Section number, e.g. 1910.147.
        citation: String,
    },

    /// Estimate penalty exposure for a list of violations.
    Fines {
        /// Violation class: serious, willful, repeat or other.
        #[arg(long = "type", default_value = "serious")]
        violation_type: String,

        /// One argument per violation.
        violations: Vec<String>,
    },

    /// List the tools this server exposes.
    Tools,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration (API key masked).
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, from_file) = load_config(&cli.config).await?;

    // stdout belongs to the protocol; logs always go to stderr.
    let filter = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if !from_file {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    match cli.command {
        Commands::Serve => cmd_serve(&config).await?,
        Commands::Check { scenario, detailed } => {
            let detail = if detailed { "detailed" } else { "quick" };
            let args = json!({ "scenario": scenario.join(" "), "detail_level": detail });
            run_tool(&config, "compliance_check", args).await?
        }
        Commands::Cite { citation } => {
            run_tool(&config, "citation_search", json!({ "citation": citation })).await?
        }
        Commands::Fines {
            violation_type,
            violations,
        } => {
            let args = json!({ "violations": violations, "violation_type": violation_type });
            run_tool(&config, "fine_calculator", args).await?
        }
        Commands::Tools => cmd_tools(&config).await?,
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

async fn cmd_serve(config: &AppConfig) -> Result<()> {
    info!(name = %config.server.name, mode = %config.server.mode, "Starting SafeCite");
    let server = safecite_core::build_server(config)
        .await
        .context("failed to start server")?;
    server.run_stdio().await?;
    Ok(())
}

async fn run_tool(config: &AppConfig, tool: &str, args: serde_json::Value) -> Result<()> {
    let dispatcher = safecite_core::init(config)
        .await
        .context("failed to load knowledge data")?;
    println!("{}", dispatcher.dispatch(tool, &args).await);
    Ok(())
}

async fn cmd_tools(config: &AppConfig) -> Result<()> {
    let dispatcher = safecite_core::init(config).await?;
    let defs = dispatcher.registry().definitions();
    println!("{}", serde_json::to_string_pretty(&defs)?);
    Ok(())
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str = toml::to_string_pretty(&config.redacted())
            .map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// Load the config file (defaults if absent) and apply environment overrides.
///
/// The flag reports whether the file existed.
async fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    let from_file = tokio::fs::try_exists(path).await.unwrap_or(false);
    let mut config = if from_file {
        AppConfig::load(path)
            .await
            .with_context(|| format!("invalid config at {}", path.display()))?
    } else {
        AppConfig::default()
    };
    config.apply_env_overrides()?;
    Ok((config, from_file))
}
