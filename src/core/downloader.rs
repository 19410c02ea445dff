use crate::core::processed::ProcessedLog;
use crate::core::rate_limit::RateLimiter;
use crate::domain::model::{
    AppId, AppReport, BatchReport, PageOutcome, RateLimits, RequestParams, ReviewArchive,
    ReviewPage,
};
use crate::domain::ports::{BatchDownloader, ReviewSource, Storage};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use tokio::sync::Mutex;

const FIRST_CURSOR: &str = "*";

/// Pages through Steam reviews for each app and keeps one JSON archive per app.
pub struct SteamReviewDownloader<R: ReviewSource, S: Storage> {
    source: R,
    storage: S,
    params: RequestParams,
    limiter: Mutex<RateLimiter>,
    skip_processed: bool,
}

impl<R: ReviewSource, S: Storage> SteamReviewDownloader<R, S> {
    pub fn new(source: R, storage: S, params: RequestParams, limits: RateLimits) -> Self {
        Self {
            source,
            storage,
            params,
            limiter: Mutex::new(RateLimiter::new(limits)),
            skip_processed: true,
        }
    }

    /// When false, ids already listed in today's processed log are fetched again.
    pub fn with_skip_processed(mut self, skip_processed: bool) -> Self {
        self.skip_processed = skip_processed;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn load_archive(&self, app_id: AppId) -> Result<ReviewArchive> {
        match self.storage.read_file(&ReviewArchive::file_name(app_id)).await? {
            Some(bytes) => {
                let archive: ReviewArchive = serde_json::from_slice(&bytes)?;
                tracing::debug!(
                    "Resuming app {} with {} stored reviews",
                    app_id,
                    archive.reviews.len()
                );
                Ok(archive)
            }
            None => Ok(ReviewArchive::default()),
        }
    }

    pub async fn save_archive(&self, app_id: AppId, archive: &ReviewArchive) -> Result<()> {
        let data = serde_json::to_vec(archive)?;
        tracing::debug!("Writing {} bytes for app {}", data.len(), app_id);
        self.storage
            .write_file(&ReviewArchive::file_name(app_id), &data)
            .await
    }

    /// Downloads every reachable review page for one app and saves the archive.
    ///
    /// Whatever was collected is saved even if paging fails part way.
    pub async fn download_app(&self, app_id: AppId) -> Result<AppReport> {
        let mut archive = self.load_archive(app_id).await?;
        let mut report = AppReport {
            app_id,
            total_reviews: archive.reviews.len(),
            new_reviews: 0,
            pages: 0,
        };

        let mut changed = false;
        let paged = self
            .page_through(app_id, &mut archive, &mut report, &mut changed)
            .await;

        if let Err(e) = paged {
            if changed {
                if let Err(save_err) = self.save_archive(app_id, &archive).await {
                    tracing::warn!("Could not save partial archive for app {}: {}", app_id, save_err);
                }
            }
            return Err(e);
        }

        self.save_archive(app_id, &archive).await?;
        report.total_reviews = archive.reviews.len();
        Ok(report)
    }

    async fn page_through(
        &self,
        app_id: AppId,
        archive: &mut ReviewArchive,
        report: &mut AppReport,
        changed: &mut bool,
    ) -> Result<()> {
        let mut limiter = self.limiter.lock().await;
        let mut cursor = FIRST_CURSOR.to_string();
        let mut visited = HashSet::new();
        // 只跟上次存檔時的 id 比較，同一輪重複出現的不算
        let stored_ids: HashSet<String> = archive.reviews.keys().cloned().collect();

        loop {
            let page = self.fetch_with_retries(app_id, &cursor, &mut limiter).await?;
            report.pages += 1;

            if page.success != 1 {
                // 第一頁失敗通常代表 app id 不存在
                if cursor == FIRST_CURSOR {
                    return Err(FetchError::UnsuccessfulResponseError {
                        app_id: app_id.0,
                        success: page.success,
                    });
                }
                tracing::warn!(
                    "Steam returned success={} for app {} mid-listing, stopping",
                    page.success,
                    app_id
                );
                break;
            }

            if cursor == FIRST_CURSOR {
                archive.query_summary = page.query_summary.clone();
            }
            archive
                .cursors
                .insert(cursor.clone(), Utc::now().to_rfc3339());
            visited.insert(cursor.clone());
            *changed = true;

            let page_size = page.reviews.len();
            let known = merge_reviews(archive, page.reviews, &stored_ids, report);
            tracing::debug!(
                "App {} page {}: {} reviews, {} new so far",
                app_id,
                report.pages,
                page_size,
                report.new_reviews
            );

            if page_size == 0 {
                break;
            }
            // An edited old review can surface early in the listing, so only a
            // page made entirely of stored reviews ends an incremental update.
            if known == page_size && self.params.filter.stops_on_known_review() {
                tracing::debug!("App {} reached reviews already on disk", app_id);
                break;
            }

            match page.cursor {
                Some(next) if !visited.contains(&next) => cursor = next,
                _ => break,
            }
        }

        Ok(())
    }

    async fn fetch_with_retries(
        &self,
        app_id: AppId,
        cursor: &str,
        limiter: &mut RateLimiter,
    ) -> Result<ReviewPage> {
        let mut failures = 0;

        loop {
            limiter.acquire().await;
            let outcome = self.source.fetch_page(app_id, &self.params, cursor).await?;

            let transient = match outcome {
                PageOutcome::Page(page) => return Ok(page),
                other => other,
            };

            failures += 1;
            if failures > limiter.limits().max_transient_retries {
                return Err(FetchError::RetriesExhaustedError {
                    app_id: app_id.0,
                    attempts: failures,
                });
            }

            match transient {
                PageOutcome::RateLimited => limiter.on_rate_limited().await,
                _ => limiter.on_bad_gateway().await,
            }
        }
    }
}

/// Merges a page into the archive and returns how many of its reviews were
/// already in `stored_ids` before this run started.
fn merge_reviews(
    archive: &mut ReviewArchive,
    reviews: Vec<serde_json::Value>,
    stored_ids: &HashSet<String>,
    report: &mut AppReport,
) -> usize {
    let mut known = 0;

    for review in reviews {
        let Some(id) = review_id(&review) else {
            tracing::warn!("Skipping review without recommendationid");
            continue;
        };
        if stored_ids.contains(&id) {
            known += 1;
        }
        if archive.reviews.insert(id, review).is_none() {
            report.new_reviews += 1;
        }
    }

    known
}

fn review_id(review: &serde_json::Value) -> Option<String> {
    match review.get("recommendationid")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl<R: ReviewSource, S: Storage> BatchDownloader for SteamReviewDownloader<R, S> {
    async fn download_batch(&self, app_ids: &[AppId]) -> Result<BatchReport> {
        let mut processed = ProcessedLog::load(&self.storage, ProcessedLog::today_file_name()).await?;
        let mut report = BatchReport::default();

        for &app_id in app_ids {
            if self.skip_processed && processed.contains(app_id) {
                tracing::info!("⏭️  App {} already processed today, skipping", app_id);
                report.skipped.push(app_id);
                continue;
            }

            tracing::info!("📥 Downloading reviews for app {}", app_id);
            let app_report = self.download_app(app_id).await?;
            processed.mark(&self.storage, app_id).await?;

            tracing::info!(
                "✅ App {}: {} reviews stored ({} new, {} pages)",
                app_id,
                app_report.total_reviews,
                app_report.new_reviews,
                app_report.pages
            );
            report.downloaded.push(app_report);
        }

        Ok(report)
    }
}
