use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

/// Terminal state of one asset download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssetStatus {
    Downloaded { bytes: usize, duration_ms: u64 },
    Skipped { reason: String, status_code: Option<u16> },
}

/// Outcome of a single download task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Remote URL of the asset
    pub url: String,

    /// Where the asset was (or would have been) written
    pub path: PathBuf,

    #[serde(flatten)]
    pub status: AssetStatus,
}

impl AssetRecord {
    pub fn is_downloaded(&self) -> bool {
        matches!(self.status, AssetStatus::Downloaded { .. })
    }
}

/// Aggregate result of downloading every asset of a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadReport {
    /// When the batch was started
    pub started_at: DateTime<Utc>,

    /// When the last task settled
    pub finished_at: DateTime<Utc>,

    /// One record per task, in task order
    pub assets: Vec<AssetRecord>,
}

impl DownloadReport {
    /// Report for a batch that had nothing to do
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            assets: Vec::new(),
        }
    }

    pub fn from_records(started_at: DateTime<Utc>, assets: Vec<AssetRecord>) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            assets,
        }
    }

    pub fn total(&self) -> usize {
        self.assets.len()
    }

    pub fn downloaded_count(&self) -> usize {
        self.assets.iter().filter(|a| a.is_downloaded()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.total() - self.downloaded_count()
    }

    /// Records of the assets that could not be saved
    pub fn skipped(&self) -> impl Iterator<Item = &AssetRecord> {
        self.assets.iter().filter(|a| !a.is_downloaded())
    }

    pub fn bytes_downloaded(&self) -> usize {
        self.assets
            .iter()
            .map(|a| match a.status {
                AssetStatus::Downloaded { bytes, .. } => bytes,
                AssetStatus::Skipped { .. } => 0,
            })
            .sum()
    }

    /// HTTP status code counts among skipped assets
    pub fn failure_status_codes(&self) -> HashMap<u16, usize> {
        let mut codes = HashMap::new();
        for asset in &self.assets {
            if let AssetStatus::Skipped {
                status_code: Some(code),
                ..
            } = asset.status
            {
                *codes.entry(code).or_default() += 1;
            }
        }
        codes
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Request timer for measuring download durations
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time in milliseconds
    pub fn end(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
