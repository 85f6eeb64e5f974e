//! CLI for the dropdl catalog archiver.

mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use dropdl_core::config;
use dropdl_core::layout::RunLayout;
use std::path::PathBuf;

use commands::{run_download, run_full, run_scrape, run_status};

/// Top-level CLI for the dropdl catalog archiver.
#[derive(Debug, Parser)]
#[command(name = "dropdl")]
#[command(about = "dropdl: Dropout catalog scraper and yt-dlp batch driver", long_about = None)]
pub struct Cli {
    /// Base directory where downloaded media is stored.
    #[arg(long, global = true, default_value = "Dropout", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Directory holding cookies.txt, archive.txt and the episode manifest.
    #[arg(long, global = true, default_value = "config", value_name = "DIR")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Crawl the catalog, then download everything new via yt-dlp.
    Run,

    /// Crawl the catalog and write the episode manifest, without downloading.
    Scrape,

    /// Run yt-dlp over an existing episode manifest.
    Download,

    /// Show manifest/archive/cookie state for the configured directories.
    Status {
        /// Emit machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions on stdout.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Completions need no directories or config.
        if let CliCommand::Completions { shell } = &cli.command {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "dropdl", &mut std::io::stdout());
            return Ok(());
        }

        let layout = RunLayout::new(&cli.output_dir, &cli.config_dir)?;
        layout.ensure_config_dir()?;
        let cfg = config::load_or_init(layout.config_dir())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run => run_full(&cfg, &layout).await?,
            CliCommand::Scrape => run_scrape(&cfg, &layout).await?,
            CliCommand::Download => run_download(&cfg, &layout).await?,
            CliCommand::Status { json } => run_status(&layout, json)?,
            CliCommand::Completions { .. } => {} // handled above
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
