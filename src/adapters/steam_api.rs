use crate::domain::model::{AppId, PageOutcome, RequestParams, ReviewPage};
use crate::domain::ports::ReviewSource;
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const STEAM_REVIEWS_URL: &str = "https://store.steampowered.com/appreviews";

/// HTTP client for the Steam `appreviews` endpoint.
#[derive(Debug, Clone)]
pub struct SteamApiClient {
    client: Client,
    base_url: String,
}

impl SteamApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("steam-review-fetch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn app_url(&self, app_id: AppId) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), app_id)
    }
}

#[async_trait]
impl ReviewSource for SteamApiClient {
    async fn fetch_page(
        &self,
        app_id: AppId,
        params: &RequestParams,
        cursor: &str,
    ) -> Result<PageOutcome> {
        let url = self.app_url(app_id);
        tracing::debug!("Requesting {} with cursor {}", url, cursor);

        let response = self
            .client
            .get(&url)
            .query(&params.query_pairs(cursor))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Steam API response status: {}", status);

        match status {
            StatusCode::TOO_MANY_REQUESTS => Ok(PageOutcome::RateLimited),
            StatusCode::BAD_GATEWAY => Ok(PageOutcome::BadGateway),
            s if s.is_success() => {
                let page: ReviewPage = response.json().await?;
                Ok(PageOutcome::Page(page))
            }
            s => Err(FetchError::ApiStatusError {
                app_id: app_id.0,
                status: s.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> SteamApiClient {
        SteamApiClient::new(server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_app_url_trims_trailing_slash() {
        let client = SteamApiClient::new("https://example.com/appreviews/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.app_url(AppId(1158310)),
            "https://example.com/appreviews/1158310"
        );
    }

    #[tokio::test]
    async fn test_fetch_page_sends_query_params() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/1158310")
                .query_param("json", "1")
                .query_param("language", "all")
                .query_param("filter", "updated")
                .query_param("num_per_page", "100")
                .query_param("cursor", "*");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "success": 1,
                    "query_summary": {"num_reviews": 1, "total_reviews": 1},
                    "reviews": [{"recommendationid": "100", "review": "Long live the king"}],
                    "cursor": "AoJ4"
                }));
        });

        let outcome = client_for(&server)
            .fetch_page(AppId(1158310), &RequestParams::default(), "*")
            .await
            .unwrap();

        api_mock.assert();
        match outcome {
            PageOutcome::Page(page) => {
                assert_eq!(page.reviews.len(), 1);
                assert_eq!(page.cursor.as_deref(), Some("AoJ4"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cursor_is_url_encoded() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/1303182")
                .query_param("cursor", "AoJ4+/x=");
            then.status(200).json_body(serde_json::json!({
                "success": 1,
                "reviews": []
            }));
        });

        client_for(&server)
            .fetch_page(AppId(1303182), &RequestParams::default(), "AoJ4+/x=")
            .await
            .unwrap();

        api_mock.assert();
    }

    #[tokio::test]
    async fn test_throttling_statuses_are_outcomes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/1");
            then.status(429);
        });
        server.mock(|when, then| {
            when.method(GET).path("/2");
            then.status(502);
        });

        let client = client_for(&server);
        let params = RequestParams::default();

        assert!(matches!(
            client.fetch_page(AppId(1), &params, "*").await.unwrap(),
            PageOutcome::RateLimited
        ));
        assert!(matches!(
            client.fetch_page(AppId(2), &params, "*").await.unwrap(),
            PageOutcome::BadGateway
        ));
    }

    #[tokio::test]
    async fn test_other_statuses_are_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/1158310");
            then.status(500);
        });

        let err = client_for(&server)
            .fetch_page(AppId(1158310), &RequestParams::default(), "*")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::ApiStatusError {
                app_id: 1158310,
                status: 500
            }
        ));
    }
}
