//! Saves a fetched page: assets directory, downloads, then both HTML files.

use scraper::Html;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::classifier::classify;
use super::naming::OutputLayout;
use super::orchestrator::{run_downloads, DownloadOptions};
use super::source::SourceUrl;
use crate::error::LoadError;
use crate::fetch::Fetcher;
use crate::storage::files;
use crate::utils::metrics::DownloadReport;

/// Everything written for one page
#[derive(Debug, Clone)]
pub struct SavedPage {
    /// Rewritten page, `{outputDir}/{htmlBasename}.html`
    pub html_path: PathBuf,

    /// Untouched copy, `{outputDir}/{assetsDirName}/{htmlBasename}.html`
    pub backup_path: PathBuf,

    pub assets_dir: PathBuf,

    pub report: DownloadReport,
}

/// Save `body`, fetched from `source`, into `output_dir`.
///
/// Refuses to touch the filesystem when the assets directory already exists.
/// Asset failures end up in the report; only directory and HTML write
/// failures are errors.
pub async fn save_page(
    fetcher: &dyn Fetcher,
    body: &[u8],
    source: &SourceUrl,
    output_dir: &Path,
    options: &DownloadOptions,
) -> Result<SavedPage, LoadError> {
    let layout = OutputLayout::for_url(source);
    let assets_dir = layout.assets_dir_path(output_dir);

    let already_exists = files::exists(&assets_dir)
        .await
        .map_err(|e| LoadError::io(&assets_dir, e))?;
    if already_exists {
        error!("Directory {} already exists", assets_dir.display());
        return Err(LoadError::AssetsDirExists(assets_dir));
    }

    files::create_dir(&assets_dir)
        .await
        .map_err(|e| LoadError::io(&assets_dir, e))?;

    let (rewritten, tasks) = {
        let document = Html::parse_document(&String::from_utf8_lossy(body));
        let (document, tasks) = classify(document, source, &layout);
        (document.html(), tasks)
    };
    info!("Found {} assets to download on {}", tasks.len(), source);

    let report = run_downloads(fetcher, &tasks, &assets_dir, options).await;

    let backup_path = assets_dir.join(layout.html_file_name());
    files::write_atomic(&backup_path, body)
        .await
        .map_err(|e| LoadError::io(&backup_path, e))?;

    let html_path = output_dir.join(layout.html_file_name());
    files::write_atomic(&html_path, rewritten.as_bytes())
        .await
        .map_err(|e| LoadError::io(&html_path, e))?;

    info!("Page was successfully downloaded into {}", html_path.display());

    Ok(SavedPage {
        html_path,
        backup_path,
        assets_dir,
        report,
    })
}
