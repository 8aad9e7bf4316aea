//! Configuration module for Pricecast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Market Data, Model, Server, and Recommendation.

mod market_data_config;
mod model_config;
mod recommendation_config;
mod server_config;

pub use market_data_config::MarketDataEnvConfig;
pub use model_config::{DEFAULT_MODEL_PATH, ModelEnvConfig};
pub use recommendation_config::RecommendationEnvConfig;
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
///
/// Aggregates the sub-configs so the composition root only needs one value.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub market_data: MarketDataEnvConfig,
    pub model: ModelEnvConfig,
    pub server: ServerEnvConfig,
    pub recommendation: RecommendationEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let market_data = MarketDataEnvConfig::from_lookup(&lookup)
            .context("Failed to load market data config")?;
        let model = ModelEnvConfig::from_lookup(&lookup);
        let server = ServerEnvConfig::from_lookup(&lookup);
        let recommendation = RecommendationEnvConfig::from_lookup(&lookup)
            .context("Failed to load recommendation config")?;

        Ok(Self {
            market_data,
            model,
            server,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_composes_sub_configs() {
        let vars: HashMap<&str, &str> = [
            ("COIN_ID", "solana"),
            ("MODEL_PATH", "/tmp/model.json"),
            ("SERVER_PORT", "8081"),
            ("TREND_THRESHOLD", "10"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.market_data.coin_id, "solana");
        assert_eq!(config.model.model_path.to_str(), Some("/tmp/model.json"));
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.recommendation.trend_threshold, 10.0);
    }

    #[test]
    fn test_config_propagates_sub_config_errors() {
        let err = Config::from_lookup(|k| (k == "TREND_THRESHOLD").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("recommendation config"));
    }
}
