//! CoinGecko Market Data Service
//!
//! Fetches the trailing daily price history for one coin from the public
//! `/coins/{id}/market_chart` endpoint.

use crate::config::MarketDataEnvConfig;
use crate::domain::ports::PriceHistoryProvider;
use crate::domain::types::PricePoint;
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url_with_query};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
}

pub struct CoinGeckoMarketDataService {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
    coin_id: String,
    vs_currency: String,
    history_days: u32,
}

impl CoinGeckoMarketDataService {
    pub fn new(config: &MarketDataEnvConfig) -> Self {
        Self {
            client: HttpClientFactory::create_client(
                config.max_retries,
                Duration::from_secs(config.timeout_secs),
            ),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            coin_id: config.coin_id.clone(),
            vs_currency: config.vs_currency.clone(),
            history_days: config.history_days,
        }
    }

    pub fn market_chart_url(&self) -> Result<url::Url> {
        let days = self.history_days.to_string();
        build_url_with_query(
            &format!("{}/coins/{}/market_chart", self.base_url, self.coin_id),
            &[
                ("vs_currency", self.vs_currency.as_str()),
                ("days", days.as_str()),
                ("interval", "daily"),
            ],
        )
    }
}

/// Parses a `market_chart` body into price points, preserving response order.
pub fn parse_market_chart(body: &str) -> Result<Vec<PricePoint>> {
    let response: MarketChartResponse =
        serde_json::from_str(body).context("Failed to parse CoinGecko market_chart response")?;

    if response.prices.is_empty() {
        anyhow::bail!("CoinGecko market_chart response contained no prices");
    }

    response
        .prices
        .into_iter()
        .map(|(timestamp_ms, price)| -> Result<PricePoint> {
            let timestamp = DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64)
                .with_context(|| format!("Invalid timestamp in price data: {}", timestamp_ms))?;
            if !price.is_finite() {
                anyhow::bail!("Non-finite price at {}", timestamp);
            }
            Ok(PricePoint { timestamp, price })
        })
        .collect()
}

#[async_trait]
impl PriceHistoryProvider for CoinGeckoMarketDataService {
    async fn fetch_history(&self) -> Result<Vec<PricePoint>> {
        let url = self.market_chart_url()?;
        info!(
            "CoinGecko: Fetching {} days of {}/{} history",
            self.history_days, self.coin_id, self.vs_currency
        );

        let mut request = self.client.get(url.as_str());
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to CoinGecko")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("CoinGecko API returned status {}: {}", status, error_text);
        }

        let body = response
            .text()
            .await
            .context("Failed to read CoinGecko response body")?;
        let points = parse_market_chart(&body)?;

        debug!("CoinGecko: Received {} price points", points.len());
        Ok(points)
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE_BODY: &str = r#"{
        "prices": [[1704067200000, 3530000.5], [1704153600000, 3610000.25], [1704240000000, 3475000.0]],
        "market_caps": [[1704067200000, 1.0]],
        "total_volumes": [[1704067200000, 2.0]]
    }"#;

    #[test]
    fn test_parse_market_chart() {
        let points = parse_market_chart(SAMPLE_BODY).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(
            points[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(points[1].price, 3610000.25);
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_parse_rejects_empty_prices() {
        let err = parse_market_chart(r#"{"prices": []}"#).unwrap_err();
        assert!(err.to_string().contains("no prices"));
    }

    #[test]
    fn test_parse_rejects_malformed_body() {
        assert!(parse_market_chart("<html>rate limited</html>").is_err());
        assert!(parse_market_chart(r#"{"status": {"error_code": 429}}"#).is_err());
        assert!(parse_market_chart(r#"{"prices": [[1704067200000]]}"#).is_err());
    }

    #[test]
    fn test_market_chart_url() {
        let service = CoinGeckoMarketDataService::new(&MarketDataEnvConfig::default());
        let url = service.market_chart_url().unwrap();
        assert_eq!(url.path(), "/api/v3/coins/bitcoin/market_chart");
        assert_eq!(url.query(), Some("vs_currency=inr&days=365&interval=daily"));
    }
}
