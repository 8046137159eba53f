use anyhow::{Context, Result};

use crate::client::{DEFAULT_API_URL, DEFAULT_SEARCH_LIMIT, MAX_PER_PAGE};

pub const API_URL_VAR: &str = "GITHUB_API_URL";
pub const SEARCH_LIMIT_VAR: &str = "GITHUB_SEARCH_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub search_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(SEARCH_LIMIT_VAR).filter(|v| !v.trim().is_empty()) {
            let limit: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("{SEARCH_LIMIT_VAR} is not a number: {raw}"))?;
            if !(1..=MAX_PER_PAGE).contains(&limit) {
                anyhow::bail!(
                    "{SEARCH_LIMIT_VAR} must be between 1 and {MAX_PER_PAGE}, got {limit}"
                );
            }
            config.search_limit = limit;
        }

        Ok(config)
    }
}
