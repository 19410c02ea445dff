use crate::domain::model::{AppId, BatchReport, PageOutcome, RateLimits, RequestParams};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    /// `Ok(None)` when the file does not exist yet.
    fn read_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn app_ids(&self) -> Vec<AppId>;
    fn request_params(&self) -> RequestParams;
    fn rate_limits(&self) -> RateLimits;
    fn request_timeout(&self) -> Duration;
    fn skip_processed(&self) -> bool;
    fn monitoring_enabled(&self) -> bool;
}

/// Where review pages come from.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    async fn fetch_page(
        &self,
        app_id: AppId,
        params: &RequestParams,
        cursor: &str,
    ) -> Result<PageOutcome>;
}

/// The batch-download capability the fetch driver delegates to.
#[async_trait]
pub trait BatchDownloader: Send + Sync {
    async fn download_batch(&self, app_ids: &[AppId]) -> Result<BatchReport>;
}
