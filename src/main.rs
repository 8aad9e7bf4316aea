//! Pricecast Server
//!
//! Trains the price model on first start (when no artifact exists), then
//! serves the prediction page.
//!
//! # Usage
//! ```sh
//! SERVER_PORT=5000 VS_CURRENCY=inr cargo run --bin pricecast
//! ```
//!
//! # Environment Variables
//! - `MODEL_PATH` - Model artifact location (default: data/model/price_model.json)
//! - `COIN_ID` / `VS_CURRENCY` - Tracked coin and quote currency (default: bitcoin / inr)
//! - `TREND_THRESHOLD` - Price move separating BUY/SELL from HOLD (default: 5000)
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::Result;
use pricecast::application::system::Application;
use pricecast::config::Config;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Pricecast Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Coin={}, Currency={}, Threshold={}, Theme={:?}",
        config.market_data.coin_id,
        config.market_data.vs_currency,
        config.recommendation.trend_threshold,
        config.recommendation.chart_theme
    );

    let app = Application::build(config)?;
    app.run().await
}
