//! Slugs and output names derived from a page URL.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::source::SourceUrl;

fn word_runs() -> &'static Regex {
    static WORD_RUNS: OnceLock<Regex> = OnceLock::new();
    WORD_RUNS.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9_]+").expect("word-run pattern compiles")
    })
}

/// Turn an arbitrary string into a filesystem-safe slug.
///
/// Keeps the runs of ASCII letters, digits and underscores and joins them
/// with `-`. Everything else is dropped, so `"a.b/c"` becomes `"a-b-c"`.
pub fn format_name(raw: &str) -> String {
    word_runs()
        .find_iter(raw)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join("-")
}

/// Names shared by every file written for one page.
///
/// Computed once per source URL; the same URL always yields the same names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Slug of host and path, used for both saved HTML files
    pub html_basename: String,

    /// Directory holding the assets and the pristine copy of the page
    pub assets_dir_name: String,

    /// Prefix of every downloaded asset file name
    pub assets_basename: String,
}

impl OutputLayout {
    pub fn for_url(source: &SourceUrl) -> Self {
        let html_basename = html_basename(source);

        Self {
            assets_dir_name: html_basename.clone(),
            html_basename,
            assets_basename: assets_basename(source),
        }
    }

    /// `{outputDir}/{assetsDirName}`
    pub fn assets_dir_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.assets_dir_name)
    }

    /// File name of the saved page, shared by the rewritten page and its backup
    pub fn html_file_name(&self) -> String {
        format!("{}.html", self.html_basename)
    }

    /// Link target for references to the page itself
    pub fn self_reference(&self) -> String {
        format!("{}/{}", self.assets_dir_name, self.html_file_name())
    }

    /// Link target for a downloaded asset
    pub fn asset_reference(&self, asset_file_name: &str) -> String {
        format!("{}/{}", self.assets_dir_name, asset_file_name)
    }

    /// Local file name for an asset whose remote path is `remote_path`.
    ///
    /// The extension is copied verbatim and never slugged. Two remote paths
    /// with the same slug map to the same file name.
    pub fn asset_file_name(&self, remote_path: &str) -> String {
        let path = Path::new(remote_path);
        let stem = path.file_stem().map(Path::new).unwrap_or(Path::new(""));
        let without_extension = match path.parent() {
            Some(parent) => parent.join(stem),
            None => stem.to_path_buf(),
        };

        format!(
            "{}-{}{}",
            self.assets_basename,
            format_name(&without_extension.to_string_lossy()),
            path_extension(remote_path)
        )
    }
}

pub fn html_basename(source: &SourceUrl) -> String {
    format_name(&format!("{}/{}", source.host(), source.path()))
}

pub fn assets_basename(source: &SourceUrl) -> String {
    format_name(source.host())
}

pub fn assets_dir_name(source: &SourceUrl) -> String {
    OutputLayout::for_url(source).assets_dir_name
}

pub fn assets_dir_path(source: &SourceUrl, output_dir: &Path) -> PathBuf {
    OutputLayout::for_url(source).assets_dir_path(output_dir)
}

/// Extension of the last path segment including the dot, or empty.
pub(crate) fn path_extension(remote_path: &str) -> String {
    Path::new(remote_path)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
