use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::storage::StorePaths;

pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_COMMENT_FETCH_LIMIT: u32 = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const ACTION_LOG_FILE: &str = "log_facebook.txt";

/// Application configuration loaded from environment variables
///
/// Missing credentials are not an error here: the gateway is built in a
/// disabled state and reports the problem on first use.
#[derive(Debug, Clone)]
pub struct Config {
    pub page_access_token: Option<String>,
    pub page_id: Option<String>,
    pub proxy_url: Option<String>,
    pub graph_api_url: String,
    pub data_dir: PathBuf,
    pub action_log: PathBuf,
    pub check_interval: Duration,
    pub comment_limit: u32,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get("PAGEBOT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let action_log = get("PAGEBOT_ACTION_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(ACTION_LOG_FILE));

        Ok(Self {
            page_access_token: get("FACEBOOK_PAGE_ACCESS_TOKEN"),
            page_id: get("FACEBOOK_PAGE_ID"),
            proxy_url: get("PROXY_URL"),
            graph_api_url: get("GRAPH_API_URL")
                .unwrap_or_else(|| graph_client::DEFAULT_BASE_URL.to_string()),
            check_interval: Duration::from_secs(
                parse_or(get("CHECK_INTERVAL_SECS"), DEFAULT_CHECK_INTERVAL_SECS)
                    .context("CHECK_INTERVAL_SECS must be a whole number of seconds")?,
            ),
            comment_limit: parse_or(get("COMMENT_FETCH_LIMIT"), DEFAULT_COMMENT_FETCH_LIMIT)
                .context("COMMENT_FETCH_LIMIT must be a whole number")?,
            request_timeout: Duration::from_secs(
                parse_or(get("REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS)
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            data_dir,
            action_log,
        })
    }

    pub fn store_paths(&self) -> StorePaths {
        StorePaths::in_dir(&self.data_dir)
    }

    pub fn has_credentials(&self) -> bool {
        self.page_access_token.is_some() && self.page_id.is_some()
    }
}

fn parse_or<T>(raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => Ok(raw.trim().parse()?),
        None => Ok(default),
    }
}
