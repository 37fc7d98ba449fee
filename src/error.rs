use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fetch::FetchError;

/// Errors that abort a whole page load.
///
/// Per-asset failures never show up here; they are recorded as skipped
/// entries in the download report instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid page url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to fetch page: {0}")]
    Fetch(#[from] FetchError),

    #[error("directory {} already exists", .0.display())]
    AssetsDirExists(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
