//! Market data configuration parsing from environment variables.
//!
//! This module handles loading the CoinGecko endpoint, the tracked coin and
//! the trailing history window used for training.

use anyhow::{Context, Result};
use std::env;

/// Market data environment configuration
#[derive(Debug, Clone)]
pub struct MarketDataEnvConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub coin_id: String,
    pub vs_currency: String,
    pub history_days: u32,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for MarketDataEnvConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            api_key: None,
            coin_id: "bitcoin".to_string(),
            vs_currency: "inr".to_string(),
            history_days: 365,
            max_retries: 0,
            timeout_secs: 30,
        }
    }
}

impl MarketDataEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let history_days = match lookup("HISTORY_DAYS") {
            Some(v) => v.parse::<u32>().context("Failed to parse HISTORY_DAYS")?,
            None => defaults.history_days,
        };
        if history_days == 0 {
            anyhow::bail!("HISTORY_DAYS must be at least 1");
        }

        let max_retries = match lookup("MARKET_DATA_MAX_RETRIES") {
            Some(v) => v
                .parse::<u32>()
                .context("Failed to parse MARKET_DATA_MAX_RETRIES")?,
            None => defaults.max_retries,
        };

        let timeout_secs = match lookup("MARKET_DATA_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .context("Failed to parse MARKET_DATA_TIMEOUT_SECS")?,
            None => defaults.timeout_secs,
        };

        Ok(Self {
            base_url: lookup("COINGECKO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key: lookup("COINGECKO_API_KEY").filter(|k| !k.is_empty()),
            coin_id: lookup("COIN_ID").unwrap_or(defaults.coin_id),
            vs_currency: lookup("VS_CURRENCY")
                .map(|c| c.to_lowercase())
                .unwrap_or(defaults.vs_currency),
            history_days,
            max_retries,
            timeout_secs,
        })
    }
}
