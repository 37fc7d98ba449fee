pub mod commands;
pub mod config;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Page to download
    #[arg(required = true)]
    pub url: String,

    /// Directory to save the page into
    #[arg(default_value = ".")]
    pub output: PathBuf,

    /// Configuration profile to use
    #[arg(short, long, default_value = "default")]
    pub profile: String,

    /// Per-asset download timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Maximum number of simultaneous asset downloads
    #[arg(short = 'j', long)]
    pub max_concurrent: Option<usize>,

    /// Write a JSON download report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also log to the default log file
    #[arg(long)]
    pub log: bool,

    /// Also log to this file
    #[arg(long, conflicts_with = "log")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Log file requested on the command line, if any
    pub fn log_destination(&self) -> Option<PathBuf> {
        if self.log {
            Some(page_loader::utils::default_log_file())
        } else {
            self.log_file.clone()
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Process the command
pub async fn process_command(cli: Cli) -> Result<()> {
    info!("Loading {} into {}", cli.url, cli.output.display());
    // Command line parameters win over the profile
    let config =
        config::LoaderConfig::load(&cli.profile)?.with_overrides(cli.timeout, cli.max_concurrent);

    commands::load(&cli.url, &cli.output, &config, cli.report.as_deref()).await
}
