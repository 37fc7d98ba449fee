pub mod assembler;
pub mod classifier;
pub mod feed;
pub mod naming;
pub mod orchestrator;
pub mod rules;
pub mod source;

use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::LoadError;
use crate::fetch::Fetcher;

// Re-export common types
pub use assembler::{save_page, SavedPage};
pub use classifier::{classify, classify_reference, ClassifiedOutcome, DownloadTask};
pub use naming::{format_name, OutputLayout};
pub use orchestrator::{run_downloads, DownloadOptions};
pub use rules::{rule_for_tag, AssetRule, ASSET_RULES};
pub use source::SourceUrl;

/// What a successful load produced
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Page(SavedPage),
    Feed(PathBuf),
}

impl LoadOutcome {
    /// Path of the main file written
    pub fn saved_path(&self) -> &Path {
        match self {
            LoadOutcome::Page(page) => &page.html_path,
            LoadOutcome::Feed(path) => path,
        }
    }
}

/// Feeds are recognised by the URL alone
pub fn is_feed_url(url: &str) -> bool {
    url.ends_with("xml")
}

/// Fetch `url` and save it with its assets into `output_dir`.
///
/// Nothing is written when the page itself cannot be fetched.
pub async fn load(
    fetcher: &dyn Fetcher,
    url: &str,
    output_dir: &Path,
    options: &DownloadOptions,
) -> Result<LoadOutcome, LoadError> {
    let source = SourceUrl::parse(url).map_err(|source| LoadError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    info!("Fetching {}", source);
    let body = fetcher.fetch(source.url()).await.map_err(|e| {
        error!("Reading {} failed: {}", source, e);
        LoadError::from(e)
    })?;

    if is_feed_url(url) {
        let path = feed::save_feed(&body, &source, output_dir).await?;
        return Ok(LoadOutcome::Feed(path));
    }

    let page = save_page(fetcher, &body, &source, output_dir, options).await?;
    Ok(LoadOutcome::Page(page))
}
