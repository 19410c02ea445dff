use crate::adapters::STEAM_REVIEWS_URL;
use crate::domain::model::{AppId, RateLimits, RequestParams, ReviewFilter, DEFAULT_APP_IDS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "steam-review-fetch")]
#[command(about = "Download Steam reviews for a batch of app ids into JSON files")]
pub struct CliConfig {
    /// Comma-separated app ids. Defaults to 1158310,1303182
    #[arg(long, value_delimiter = ',')]
    pub app_ids: Vec<AppId>,

    #[arg(long, default_value = "data")]
    pub data_dir: String,

    #[arg(long, default_value = STEAM_REVIEWS_URL)]
    pub api_base_url: String,

    #[arg(long, value_enum, default_value_t = ReviewFilter::Updated)]
    pub filter: ReviewFilter,

    #[arg(long, default_value = "all")]
    pub language: String,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    /// Fetch again even if today's processed log lists the app
    #[arg(long)]
    pub force: bool,

    /// Path to a TOML config file; replaces the other settings
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log process CPU and memory usage")]
    pub monitor: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            app_ids: Vec::new(),
            data_dir: "data".to_string(),
            api_base_url: STEAM_REVIEWS_URL.to_string(),
            filter: ReviewFilter::Updated,
            language: "all".to_string(),
            timeout_seconds: 30,
            force: false,
            config: None,
            verbose: false,
            log_json: false,
            monitor: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn app_ids(&self) -> Vec<AppId> {
        if self.app_ids.is_empty() {
            DEFAULT_APP_IDS.to_vec()
        } else {
            self.app_ids.clone()
        }
    }

    fn request_params(&self) -> RequestParams {
        RequestParams {
            language: self.language.clone(),
            filter: self.filter,
            ..RequestParams::default()
        }
    }

    fn rate_limits(&self) -> RateLimits {
        RateLimits::default()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn skip_processed(&self) -> bool {
        !self.force
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitor
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_non_empty_string("language", &self.language)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_uses_default_ids() {
        let config = CliConfig::parse_from(["steam-review-fetch"]);

        assert_eq!(config.app_ids(), vec![AppId(1158310), AppId(1303182)]);
        assert_eq!(config.data_dir(), "data");
        assert_eq!(config.api_base_url(), STEAM_REVIEWS_URL);
        assert_eq!(config.request_params(), RequestParams::default());
        assert!(config.skip_processed());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::parse_from([
            "steam-review-fetch",
            "--app-ids",
            "570,730",
            "--filter",
            "all",
            "--language",
            "english",
            "--force",
        ]);

        assert_eq!(config.app_ids(), vec![AppId(570), AppId(730)]);
        assert_eq!(config.request_params().filter, ReviewFilter::All);
        assert_eq!(config.request_params().language, "english");
        assert!(!config.skip_processed());
    }

    #[test]
    fn test_invalid_app_id_rejected_by_parser() {
        let result = CliConfig::try_parse_from(["steam-review-fetch", "--app-ids", "ck3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let config = CliConfig {
            api_base_url: "not a url".to_string(),
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
