// Adapters layer: concrete implementations for the Steam HTTP API and local files.

pub mod steam_api;
pub mod storage;

pub use steam_api::{SteamApiClient, STEAM_REVIEWS_URL};
pub use storage::LocalStorage;
