use crate::adapters::STEAM_REVIEWS_URL;
use crate::domain::model::{AppId, RateLimits, RequestParams, ReviewFilter, DEFAULT_APP_IDS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{FetchError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub batch: BatchConfig,
    pub request: RequestParams,
    pub rate_limit: RateLimitConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: STEAM_REVIEWS_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub app_ids: Vec<AppId>,
    pub skip_processed: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            app_ids: DEFAULT_APP_IDS.to_vec(),
            skip_processed: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_queries: u32,
    pub cooldown_seconds: u64,
    pub bad_gateway_cooldown_seconds: u64,
    pub max_transient_retries: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        let limits = RateLimits::default();
        Self {
            max_queries: limits.max_queries,
            cooldown_seconds: limits.cooldown.as_secs(),
            bad_gateway_cooldown_seconds: limits.bad_gateway_cooldown.as_secs(),
            max_transient_retries: limits.max_transient_retries,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub data_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FetchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FetchError::ConfigError {
            message: format!("env placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.source.base_url
    }

    fn data_dir(&self) -> &str {
        &self.output.data_dir
    }

    fn app_ids(&self) -> Vec<AppId> {
        self.batch.app_ids.clone()
    }

    fn request_params(&self) -> RequestParams {
        self.request.clone()
    }

    fn rate_limits(&self) -> RateLimits {
        RateLimits {
            max_queries: self.rate_limit.max_queries,
            cooldown: Duration::from_secs(self.rate_limit.cooldown_seconds),
            bad_gateway_cooldown: Duration::from_secs(self.rate_limit.bad_gateway_cooldown_seconds),
            max_transient_retries: self.rate_limit.max_transient_retries,
        }
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    fn skip_processed(&self) -> bool {
        self.batch.skip_processed
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.base_url", &self.source.base_url)?;
        validation::validate_positive_number("source.timeout_seconds", self.source.timeout_seconds, 1)?;
        validation::validate_path("output.data_dir", &self.output.data_dir)?;

        if self.batch.app_ids.is_empty() {
            return Err(FetchError::MissingConfigError {
                field: "batch.app_ids".to_string(),
            });
        }

        if let Some(zero) = self.batch.app_ids.iter().find(|id| id.0 == 0) {
            return Err(FetchError::InvalidAppIdError {
                value: zero.to_string(),
                reason: "app id must be positive".to_string(),
            });
        }

        validation::validate_non_empty_string("request.language", &self.request.language)?;
        validation::validate_range("request.num_per_page", self.request.num_per_page, 1, 100)?;
        if let Some(days) = self.request.day_range {
            validation::validate_range("request.day_range", days, 1, 365)?;
            if self.request.filter != ReviewFilter::All {
                return Err(FetchError::InvalidConfigValueError {
                    field: "request.day_range".to_string(),
                    value: days.to_string(),
                    reason: format!(
                        "day_range only applies with filter = \"all\", not \"{}\"",
                        self.request.filter.as_str()
                    ),
                });
            }
        }

        validation::validate_positive_number(
            "rate_limit.max_queries",
            u64::from(self.rate_limit.max_queries),
            1,
        )?;

        Ok(())
    }
}
