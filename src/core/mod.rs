pub mod downloader;
pub mod driver;
pub mod processed;
pub mod rate_limit;

pub use crate::domain::model::{AppId, BatchReport, RateLimits, RequestParams, ReviewArchive};
pub use crate::domain::ports::{BatchDownloader, ConfigProvider, ReviewSource, Storage};
pub use crate::utils::error::Result;

use crate::adapters::{LocalStorage, SteamApiClient};
use downloader::SteamReviewDownloader;
use driver::FetchDriver;

/// Wires the Steam client and local storage from a config and runs one batch.
pub async fn run_with_config<C: ConfigProvider>(config: &C) -> Result<BatchReport> {
    let source = SteamApiClient::new(config.api_base_url(), config.request_timeout())?;
    let storage = LocalStorage::new(config.data_dir());
    let downloader = SteamReviewDownloader::new(
        source,
        storage,
        config.request_params(),
        config.rate_limits(),
    )
    .with_skip_processed(config.skip_processed());

    FetchDriver::with_app_ids(downloader, config.app_ids())
        .with_monitoring(config.monitoring_enabled())
        .run()
        .await
}
