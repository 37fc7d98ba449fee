use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::cli::config::LoaderConfig;
use page_loader::fetch::HttpFetcher;
use page_loader::loader::{self, LoadOutcome};
use page_loader::utils::DownloadReport;

/// Download a page and its assets
pub async fn load(
    url: &str,
    output: &Path,
    config: &LoaderConfig,
    report_path: Option<&Path>,
) -> Result<()> {
    let fetcher =
        HttpFetcher::new(&config.http.to_options()).context("Failed to create HTTP client")?;

    let outcome = loader::load(&fetcher, url, output, &config.download.to_options()).await?;

    if let LoadOutcome::Page(page) = &outcome {
        print_summary(&page.report);

        if let Some(path) = report_path {
            write_report(&page.report, path)?;
        }
    }

    println!("{}", outcome.saved_path().display());

    Ok(())
}

fn print_summary(report: &DownloadReport) {
    if report.total() == 0 {
        return;
    }

    eprintln!(
        "Assets: {} downloaded, {} skipped ({} bytes)",
        report.downloaded_count(),
        report.skipped_count(),
        report.bytes_downloaded()
    );

    for asset in report.skipped() {
        eprintln!("  - skipped {}", asset.url);
    }
}

fn write_report(report: &DownloadReport, path: &Path) -> Result<()> {
    let json = report.to_json().context("Failed to serialize download report")?;

    fs::write(path, json)
        .context(format!("Failed to write download report: {}", path.display()))?;

    info!("Download report written to: {}", path.display());

    Ok(())
}
