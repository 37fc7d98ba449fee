//! Concurrent asset downloads with per-task failure isolation.

use chrono::Utc;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::classifier::DownloadTask;
use crate::fetch::{FetchError, Fetcher};
use crate::storage::files;
use crate::utils::metrics::{AssetRecord, AssetStatus, DownloadReport, RequestTimer};

/// Knobs for a download batch
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Give up on a single asset after this long
    pub task_timeout: Option<Duration>,

    /// Cap on simultaneous downloads; unbounded when `None`
    pub max_concurrent: Option<usize>,
}

/// Download every task into `assets_dir`.
///
/// All tasks run concurrently. A failed fetch or write marks that task as
/// skipped and never affects the others. Returns once every task has
/// settled, with one record per task in task order.
pub async fn run_downloads(
    fetcher: &dyn Fetcher,
    tasks: &[DownloadTask],
    assets_dir: &Path,
    options: &DownloadOptions,
) -> DownloadReport {
    if tasks.is_empty() {
        debug!("No assets to download");
        return DownloadReport::empty();
    }

    info!("Downloading {} assets into {}", tasks.len(), assets_dir.display());
    let started_at = Utc::now();

    let downloads = tasks
        .iter()
        .map(|task| download_one(fetcher, task, assets_dir, options.task_timeout));

    let records: Vec<AssetRecord> = match options.max_concurrent {
        Some(limit) => stream::iter(downloads).buffered(limit.max(1)).collect().await,
        None => join_all(downloads).await,
    };

    let report = DownloadReport::from_records(started_at, records);
    info!(
        "Assets settled: {} downloaded, {} skipped",
        report.downloaded_count(),
        report.skipped_count()
    );
    report
}

async fn download_one(
    fetcher: &dyn Fetcher,
    task: &DownloadTask,
    assets_dir: &Path,
    task_timeout: Option<Duration>,
) -> AssetRecord {
    let path = assets_dir.join(&task.file_name);
    let timer = RequestTimer::start();

    let status = match fetch_with_timeout(fetcher, task, task_timeout).await {
        Ok(body) => match files::write_atomic(&path, &body).await {
            Ok(()) => {
                debug!("Saved {} to {}", task.url, path.display());
                AssetStatus::Downloaded {
                    bytes: body.len(),
                    duration_ms: timer.end(),
                }
            }
            Err(e) => {
                warn!("Skipping {}: cannot write {}: {}", task.url, path.display(), e);
                AssetStatus::Skipped {
                    reason: format!("write failed: {}", e),
                    status_code: None,
                }
            }
        },
        Err(e) => {
            warn!("Skipping {}: {}", task.url, e);
            AssetStatus::Skipped {
                reason: e.to_string(),
                status_code: e.status(),
            }
        }
    };

    AssetRecord {
        url: task.url.to_string(),
        path,
        status,
    }
}

async fn fetch_with_timeout(
    fetcher: &dyn Fetcher,
    task: &DownloadTask,
    task_timeout: Option<Duration>,
) -> Result<Vec<u8>, FetchError> {
    match task_timeout {
        Some(limit) => tokio::time::timeout(limit, fetcher.fetch(&task.url))
            .await
            .unwrap_or_else(|_| {
                Err(FetchError::Timeout {
                    url: task.url.to_string(),
                })
            }),
        None => fetcher.fetch(&task.url).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use url::Url;

    fn task(path: &str) -> DownloadTask {
        DownloadTask {
            url: Url::parse(&format!("http://example.com{}", path)).unwrap(),
            file_name: format!("example-com-{}", path.trim_start_matches('/')),
        }
    }

    fn not_found(url: &Url) -> FetchError {
        FetchError::Status {
            url: url.to_string(),
            status: 404,
            reason: "Not Found".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_resolves_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().never();

        let report = run_downloads(&fetcher, &[], dir.path(), &DownloadOptions::default()).await;

        assert_eq!(report.total(), 0);
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let tasks: Vec<_> = ["/a.png", "/missing-1.css", "/b.js", "/missing-2.png", "/c.ico"]
            .iter()
            .map(|p| task(p))
            .collect();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(5).returning(move |url| {
            counter.fetch_add(1, Ordering::SeqCst);
            if url.path().contains("missing") {
                Err(not_found(url))
            } else {
                Ok(url.path().as_bytes().to_vec())
            }
        });

        let report =
            run_downloads(&fetcher, &tasks, dir.path(), &DownloadOptions::default()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(report.total(), 5);
        assert_eq!(report.downloaded_count(), 3);
        assert_eq!(report.skipped_count(), 2);
        assert_eq!(report.failure_status_codes().get(&404), Some(&2));

        let saved = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(saved, 3);
        assert_eq!(
            std::fs::read(dir.path().join("example-com-b.js")).unwrap(),
            b"/b.js"
        );
        assert!(!dir.path().join("example-com-missing-1.css").exists());

        // records follow task order
        let urls: Vec<_> = report.assets.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(
            urls,
            tasks.iter().map(|t| t.url.as_str()).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_write_failure_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("not-created");
        let tasks = vec![task("/a.png")];

        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(b"png".to_vec()));

        let report =
            run_downloads(&fetcher, &tasks, &missing_dir, &DownloadOptions::default()).await;

        assert_eq!(report.skipped_count(), 1);
        let record = &report.assets[0];
        match &record.status {
            AssetStatus::Skipped { reason, status_code } => {
                assert!(reason.starts_with("write failed"));
                assert_eq!(*status_code, None);
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }

    /// Holds every fetch until `n` of them are in flight together
    struct Rendezvous {
        barrier: tokio::sync::Barrier,
    }

    #[async_trait::async_trait]
    impl Fetcher for Rendezvous {
        async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
            self.barrier.wait().await;
            Ok(url.path().as_bytes().to_vec())
        }
    }

    #[tokio::test]
    async fn test_uncapped_downloads_run_together() {
        let dir = tempfile::tempdir().unwrap();
        let tasks: Vec<_> = (0..5).map(|i| task(&format!("/img{}.png", i))).collect();
        let fetcher = Rendezvous {
            barrier: tokio::sync::Barrier::new(tasks.len()),
        };

        let report = tokio::time::timeout(
            Duration::from_secs(5),
            run_downloads(&fetcher, &tasks, dir.path(), &DownloadOptions::default()),
        )
        .await
        .expect("all fetches should be in flight at once");

        assert_eq!(report.downloaded_count(), 5);
    }

    #[tokio::test]
    async fn test_concurrency_cap_still_settles_everything() {
        let dir = tempfile::tempdir().unwrap();
        let tasks: Vec<_> = (0..7).map(|i| task(&format!("/img{}.png", i))).collect();

        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .times(7)
            .returning(|url| Ok(url.path().as_bytes().to_vec()));

        let options = DownloadOptions {
            max_concurrent: Some(2),
            ..DownloadOptions::default()
        };
        let report = run_downloads(&fetcher, &tasks, dir.path(), &options).await;

        assert_eq!(report.downloaded_count(), 7);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 7);
    }
}
