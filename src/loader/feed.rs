//! Feeds and other XML documents are saved verbatim, without assets.

use std::path::{Path, PathBuf};
use tracing::info;

use super::naming::OutputLayout;
use super::source::SourceUrl;
use crate::error::LoadError;
use crate::storage::files;

/// Write the fetched feed to `{outputDir}/{htmlBasename}.xml`
pub async fn save_feed(
    body: &[u8],
    source: &SourceUrl,
    output_dir: &Path,
) -> Result<PathBuf, LoadError> {
    let layout = OutputLayout::for_url(source);
    let path = output_dir.join(format!("{}.xml", layout.html_basename));

    files::write_atomic(&path, body)
        .await
        .map_err(|e| LoadError::io(&path, e))?;

    info!("Feed was successfully downloaded into {}", path.display());
    Ok(path)
}
