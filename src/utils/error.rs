use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Steam API returned HTTP {status} for app {app_id}")]
    ApiStatusError { app_id: u32, status: u16 },

    #[error("Steam API reported success={success} for app {app_id}")]
    UnsuccessfulResponseError { app_id: u32, success: i64 },

    #[error("Gave up on app {app_id} after {attempts} transient failures")]
    RetriesExhaustedError { app_id: u32, attempts: u32 },

    #[error("Invalid app id '{value}': {reason}")]
    InvalidAppIdError { value: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Storage,
    Data,
    Configuration,
}

/// 嚴重程度決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl FetchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FetchError::ApiError(_) | FetchError::RetriesExhaustedError { .. } => {
                ErrorCategory::Network
            }
            FetchError::ApiStatusError { .. } | FetchError::UnsuccessfulResponseError { .. } => {
                ErrorCategory::Api
            }
            FetchError::IoError(_) => ErrorCategory::Storage,
            FetchError::SerializationError(_) => ErrorCategory::Data,
            FetchError::InvalidAppIdError { .. }
            | FetchError::ConfigError { .. }
            | FetchError::ConfigValidationError { .. }
            | FetchError::InvalidConfigValueError { .. }
            | FetchError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Api | ErrorCategory::Data | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FetchError::ApiError(_) => "Check your network connection and try again",
            FetchError::RetriesExhaustedError { .. } => {
                "Steam is throttling or unavailable, wait a few minutes and rerun"
            }
            FetchError::ApiStatusError { .. } => "Check that --api-base-url points at the Steam review API",
            FetchError::UnsuccessfulResponseError { .. } | FetchError::InvalidAppIdError { .. } => {
                "Verify the app id exists on the Steam store"
            }
            FetchError::IoError(_) => "Check that the data directory exists and is writable",
            FetchError::SerializationError(_) => {
                "An existing review file may be corrupt, move it aside and rerun"
            }
            FetchError::ConfigError { .. }
            | FetchError::ConfigValidationError { .. }
            | FetchError::InvalidConfigValueError { .. }
            | FetchError::MissingConfigError { .. } => "Review the command line flags or config file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the review API: {}", self),
            ErrorCategory::Api => format!("The review API rejected the request: {}", self),
            ErrorCategory::Storage => format!("Could not read or write review files: {}", self),
            ErrorCategory::Data => format!("Review data could not be decoded: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
