use crate::utils::error::FetchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Steam store application id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub u32);

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppId {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u32 = s.trim().parse().map_err(|e| FetchError::InvalidAppIdError {
            value: s.to_string(),
            reason: format!("{}", e),
        })?;
        if id == 0 {
            return Err(FetchError::InvalidAppIdError {
                value: s.to_string(),
                reason: "app id must be positive".to_string(),
            });
        }
        Ok(AppId(id))
    }
}

/// Crusader Kings III, then Crusader Kings III: Royal Court.
pub const DEFAULT_APP_IDS: [AppId; 2] = [AppId(1158310), AppId(1303182)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReviewFilter {
    Recent,
    #[default]
    Updated,
    All,
}

impl ReviewFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewFilter::Recent => "recent",
            ReviewFilter::Updated => "updated",
            ReviewFilter::All => "all",
        }
    }

    /// Sorted-by-time listings can stop at the first review already on disk.
    pub fn stops_on_known_review(&self) -> bool {
        !matches!(self, ReviewFilter::All)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestParams {
    pub language: String,
    pub filter: ReviewFilter,
    pub review_type: String,
    pub purchase_type: String,
    pub num_per_page: u32,
    pub day_range: Option<u32>,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            language: "all".to_string(),
            filter: ReviewFilter::Updated,
            review_type: "all".to_string(),
            purchase_type: "all".to_string(),
            num_per_page: 100,
            day_range: None,
        }
    }
}

impl RequestParams {
    /// Query string pairs for one page, `json=1` first.
    pub fn query_pairs(&self, cursor: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("json", "1".to_string()),
            ("language", self.language.clone()),
            ("filter", self.filter.as_str().to_string()),
            ("review_type", self.review_type.clone()),
            ("purchase_type", self.purchase_type.clone()),
            ("num_per_page", self.num_per_page.to_string()),
            ("cursor", cursor.to_string()),
        ];
        if let Some(days) = self.day_range {
            pairs.push(("day_range", days.to_string()));
        }
        pairs
    }
}

/// Steam allows roughly 150 review queries per five minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimits {
    pub max_queries: u32,
    pub cooldown: Duration,
    pub bad_gateway_cooldown: Duration,
    pub max_transient_retries: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            max_queries: 150,
            cooldown: Duration::from_secs(5 * 60 + 10),
            bad_gateway_cooldown: Duration::from_secs(10),
            max_transient_retries: 10,
        }
    }
}

/// One page of `appreviews` JSON as returned by Steam.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewPage {
    pub success: i64,
    #[serde(default)]
    pub query_summary: serde_json::Value,
    #[serde(default)]
    pub reviews: Vec<serde_json::Value>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub enum PageOutcome {
    Page(ReviewPage),
    RateLimited,
    BadGateway,
}

/// On-disk archive for a single app, keyed by `recommendationid`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewArchive {
    pub reviews: BTreeMap<String, serde_json::Value>,
    pub query_summary: serde_json::Value,
    pub cursors: BTreeMap<String, String>,
}

impl ReviewArchive {
    pub fn file_name(app_id: AppId) -> String {
        format!("review_{}.json", app_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppReport {
    pub app_id: AppId,
    pub total_reviews: usize,
    pub new_reviews: usize,
    pub pages: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub downloaded: Vec<AppReport>,
    pub skipped: Vec<AppId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_app_ids() {
        assert_eq!(DEFAULT_APP_IDS, [AppId(1158310), AppId(1303182)]);
    }

    #[test]
    fn test_app_id_parsing() {
        assert_eq!("1158310".parse::<AppId>().unwrap(), AppId(1158310));
        assert_eq!(" 1303182 ".parse::<AppId>().unwrap(), AppId(1303182));
        assert!("0".parse::<AppId>().is_err());
        assert!("ck3".parse::<AppId>().is_err());
    }

    #[test]
    fn test_query_pairs() {
        let params = RequestParams::default();
        let pairs = params.query_pairs("*");
        assert_eq!(pairs[0], ("json", "1".to_string()));
        assert!(pairs.contains(&("filter", "updated".to_string())));
        assert!(pairs.contains(&("num_per_page", "100".to_string())));
        assert!(pairs.contains(&("cursor", "*".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "day_range"));

        let params = RequestParams {
            filter: ReviewFilter::All,
            day_range: Some(30),
            ..RequestParams::default()
        };
        assert!(params
            .query_pairs("AoJ4")
            .contains(&("day_range", "30".to_string())));
    }

    #[test]
    fn test_archive_tolerates_missing_fields() {
        let archive: ReviewArchive = serde_json::from_str(r#"{"reviews": {}}"#).unwrap();
        assert!(archive.cursors.is_empty());
        assert!(archive.query_summary.is_null());
    }

    #[test]
    fn test_page_deserialization() {
        let page: ReviewPage = serde_json::from_value(serde_json::json!({
            "success": 1,
            "query_summary": {"num_reviews": 1},
            "reviews": [{"recommendationid": "42"}],
            "cursor": "AoJ4"
        }))
        .unwrap();
        assert_eq!(page.success, 1);
        assert_eq!(page.reviews.len(), 1);
        assert_eq!(page.cursor.as_deref(), Some("AoJ4"));
    }
}
