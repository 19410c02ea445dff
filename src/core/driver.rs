use crate::domain::model::{AppId, BatchReport, DEFAULT_APP_IDS};
use crate::domain::ports::BatchDownloader;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Hands a fixed list of app ids to a batch downloader, once.
pub struct FetchDriver<D: BatchDownloader> {
    downloader: D,
    app_ids: Vec<AppId>,
    monitor: SystemMonitor,
}

impl<D: BatchDownloader> FetchDriver<D> {
    /// Driver over the default Crusader Kings III app ids.
    pub fn new(downloader: D) -> Self {
        Self::with_app_ids(downloader, DEFAULT_APP_IDS.to_vec())
    }

    pub fn with_app_ids(downloader: D, app_ids: Vec<AppId>) -> Self {
        Self {
            downloader,
            app_ids,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = SystemMonitor::new(enabled);
        self
    }

    pub fn app_ids(&self) -> &[AppId] {
        &self.app_ids
    }

    pub fn downloader(&self) -> &D {
        &self.downloader
    }

    /// Errors from the downloader are returned untouched.
    pub async fn run(&self) -> Result<BatchReport> {
        tracing::info!("🚀 Fetching reviews for {} apps: {:?}", self.app_ids.len(), self.app_ids);
        self.monitor.log_stats("Before download");

        let report = self.downloader.download_batch(&self.app_ids).await?;

        self.monitor.log_stats("After download");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingDownloader {
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl BatchDownloader for CountingDownloader {
        async fn download_batch(&self, app_ids: &[AppId]) -> Result<BatchReport> {
            *self.calls.lock().unwrap() += 1;
            Ok(BatchReport {
                downloaded: vec![],
                skipped: app_ids.to_vec(),
            })
        }
    }

    #[test]
    fn test_new_uses_default_ids() {
        let driver = FetchDriver::new(CountingDownloader::default());
        assert_eq!(driver.app_ids(), &[AppId(1158310), AppId(1303182)]);
    }

    #[tokio::test]
    async fn test_run_returns_downloader_report() {
        let driver = FetchDriver::with_app_ids(CountingDownloader::default(), vec![AppId(10)]);

        let report = driver.run().await.unwrap();

        assert_eq!(report.skipped, vec![AppId(10)]);
        assert_eq!(*driver.downloader().calls.lock().unwrap(), 1);
    }
}
