pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{LocalStorage, SteamApiClient};
pub use crate::core::{downloader::SteamReviewDownloader, driver::FetchDriver, run_with_config};
pub use crate::domain::model::{AppId, BatchReport, DEFAULT_APP_IDS};
pub use crate::domain::ports::{BatchDownloader, ConfigProvider};
pub use crate::utils::error::{FetchError, Result};
