//! CLI for the Ungate ad-gate bypass engine.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;
use ungate_core::config;
use ungate_core::handlers::sites;
use ungate_core::logging;

use commands::{run_configure, run_list, run_match, run_simulate};

/// Top-level CLI for the Ungate engine.
#[derive(Debug, Parser)]
#[command(name = "ungate")]
#[command(about = "Ungate: find the real URL behind ad-gate pages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List registered site handlers and their URL patterns.
    List,

    /// Show which handler (if any) claims a URL.
    Match {
        /// Page address to test.
        url: String,
    },

    /// Run the full lifecycle against a saved page snapshot.
    Run {
        /// Path to the snapshot TOML file.
        path: String,
    },

    /// Show the configuration page URL and the local config path.
    Configure,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        // Config first: its log_level seeds the filter when RUST_LOG is unset.
        let cfg = config::load_or_init().await?;
        if logging::init_logging(cfg.log_level.as_deref()).is_err() {
            logging::init_logging_stderr(cfg.log_level.as_deref());
        }
        tracing::debug!("loaded config: {:?}", cfg);
        let registry = sites::default_registry();

        match cli.command {
            CliCommand::List => run_list(&registry),
            CliCommand::Match { url } => run_match(&registry, &url),
            CliCommand::Run { path } => run_simulate(&registry, &cfg, Path::new(&path)).await?,
            CliCommand::Configure => run_configure()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
