//! Application configuration. Backend URL, paths, paging.

use crate::domain::{SortKey, DEFAULT_PAGE_SIZE};
use serde::Deserialize;

/// Default backend when nothing is configured (local dev server).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Base URL of the marketplace REST backend. Read from MARKET_SIFT_API_BASE_URL.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Directory with `categories.json`, `locations.json`, `ads.json`. When set, the
    /// fixture gateway is used instead of HTTP. Read from MARKET_SIFT_FIXTURES_DIR.
    #[serde(default)]
    pub fixtures_dir: Option<String>,

    /// Ads per page (default 12). Read from MARKET_SIFT_PAGE_SIZE.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Initial sort label, e.g. "lowest price". Read from MARKET_SIFT_DEFAULT_SORT.
    #[serde(default)]
    pub default_sort: Option<String>,

    /// Where the last filters are saved. Read from MARKET_SIFT_STATE_PATH.
    #[serde(default)]
    pub state_path: Option<String>,

    /// HTTP request timeout in seconds (default 15). Read from MARKET_SIFT_REQUEST_TIMEOUT_SECS.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("MARKET_SIFT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // Environment wins over the file.
        c = c.add_source(config::Environment::with_prefix("MARKET_SIFT").try_parsing(true));
        c.build()?.try_deserialize()
    }

    /// Returns the backend base URL without a trailing slash.
    pub fn api_base_url_or_default(&self) -> String {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Returns ads per page. Defaults to DEFAULT_PAGE_SIZE if unset or zero.
    pub fn page_size_or_default(&self) -> usize {
        self.page_size
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Returns the initial sort order. Unknown labels keep the backend order.
    pub fn default_sort_or_default(&self) -> SortKey {
        self.default_sort
            .as_deref()
            .map(SortKey::from_label)
            .unwrap_or_default()
    }

    /// Returns the filter state file path. Defaults to "./data/filters.json".
    pub fn state_path_or_default(&self) -> String {
        self.state_path
            .clone()
            .unwrap_or_else(|| "./data/filters.json".to_string())
    }

    /// Returns the HTTP timeout in seconds. Defaults to 15.
    pub fn request_timeout_secs_or_default(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(15)
    }

    /// Returns true if offline fixtures should be used instead of the backend.
    pub fn uses_fixtures(&self) -> bool {
        self.fixtures_dir.as_deref().is_some_and(|d| !d.is_empty())
    }
}
