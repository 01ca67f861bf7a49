use log::warn;
use std::env;
use std::time::Duration;

pub const DEFAULT_INDEXER_URL: &str = "https://mainnet-idx.voi.nodely.dev";
pub const PAGE_LIMIT: u32 = 1000;
pub const PAGE_DELAY: Duration = Duration::from_millis(50);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const REQUEST_DEADLINE: Duration = Duration::from_secs(300);
pub const USER_AGENT: &str = concat!("voi-round-analyzer/", env!("CARGO_PKG_VERSION"));

/// Runtime settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub indexer_url: String,
    pub page_limit: u32,
    pub page_delay: Duration,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub deadline: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            indexer_url: DEFAULT_INDEXER_URL.to_string(),
            page_limit: PAGE_LIMIT,
            page_delay: PAGE_DELAY,
            connect_timeout: CONNECT_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
            deadline: REQUEST_DEADLINE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config::from_lookup(|key| env::var(key).ok())
    }

    // Overrides on top of the defaults; bad values keep the default
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("VOI_INDEXER_URL") {
            if !url.trim().is_empty() {
                config.indexer_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Some(limit) = parse_var::<u32, _>(&lookup, "VOI_PAGE_LIMIT").filter(|l| *l > 0) {
            config.page_limit = limit;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "VOI_PAGE_DELAY_MS") {
            config.page_delay = Duration::from_millis(ms);
        }
        if let Some(secs) =
            parse_var::<u64, _>(&lookup, "VOI_REQUEST_DEADLINE_SECS").filter(|s| *s > 0)
        {
            config.deadline = Duration::from_secs(secs);
        }

        config
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {}={:?}, using default", key, raw);
            None
        }
    }
}
