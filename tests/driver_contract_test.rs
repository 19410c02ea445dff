use async_trait::async_trait;
use std::sync::Mutex;
use steam_review_fetch::{AppId, BatchDownloader, BatchReport, FetchDriver, FetchError, Result};

/// Records every batch it is handed and touches nothing else.
#[derive(Default)]
struct RecordingDownloader {
    batches: Mutex<Vec<Vec<AppId>>>,
    fail_with_status: Option<u16>,
}

#[async_trait]
impl BatchDownloader for RecordingDownloader {
    async fn download_batch(&self, app_ids: &[AppId]) -> Result<BatchReport> {
        self.batches.lock().unwrap().push(app_ids.to_vec());
        match self.fail_with_status {
            Some(status) => Err(FetchError::ApiStatusError {
                app_id: app_ids[0].0,
                status,
            }),
            None => Ok(BatchReport::default()),
        }
    }
}

#[tokio::test]
async fn test_driver_passes_literal_id_list_once() {
    let driver = FetchDriver::new(RecordingDownloader::default());

    driver.run().await.unwrap();

    let batches = driver.downloader().batches.lock().unwrap().clone();
    assert_eq!(batches, vec![vec![AppId(1158310), AppId(1303182)]]);
}

#[tokio::test]
async fn test_driver_propagates_downloader_error_unchanged() {
    let downloader = RecordingDownloader {
        fail_with_status: Some(503),
        ..RecordingDownloader::default()
    };
    let driver = FetchDriver::new(downloader);

    let err = driver.run().await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::ApiStatusError {
            app_id: 1158310,
            status: 503
        }
    ));
    assert_eq!(driver.downloader().batches.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_each_run_is_one_call() {
    let driver = FetchDriver::with_app_ids(
        RecordingDownloader::default(),
        vec![AppId(1303182), AppId(1158310)],
    );

    driver.run().await.unwrap();
    driver.run().await.unwrap();

    let batches = driver.downloader().batches.lock().unwrap().clone();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0], vec![AppId(1303182), AppId(1158310)]);
}
