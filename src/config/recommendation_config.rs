//! Recommendation and presentation configuration parsing from environment variables.
//!
//! This module handles the trend threshold used by the classifier and the
//! theme used by the chart renderer.

use crate::domain::recommendation::DEFAULT_TREND_THRESHOLD;
use crate::interfaces::chart::ChartTheme;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Recommendation environment configuration
#[derive(Debug, Clone)]
pub struct RecommendationEnvConfig {
    pub trend_threshold: f64,
    pub chart_theme: ChartTheme,
}

impl Default for RecommendationEnvConfig {
    fn default() -> Self {
        Self {
            trend_threshold: DEFAULT_TREND_THRESHOLD,
            chart_theme: ChartTheme::Light,
        }
    }
}

impl RecommendationEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let trend_threshold = match lookup("TREND_THRESHOLD") {
            Some(v) => v
                .parse::<f64>()
                .context("Failed to parse TREND_THRESHOLD")?,
            None => DEFAULT_TREND_THRESHOLD,
        };
        if !trend_threshold.is_finite() || trend_threshold < 0.0 {
            anyhow::bail!(
                "TREND_THRESHOLD must be a non-negative number, got {}",
                trend_threshold
            );
        }

        let chart_theme = match lookup("CHART_THEME") {
            Some(v) => ChartTheme::from_str(&v)?,
            None => ChartTheme::Light,
        };

        Ok(Self {
            trend_threshold,
            chart_theme,
        })
    }
}
