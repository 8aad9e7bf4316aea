//! Forces a retrain of the price model, overwriting any existing artifact.
//!
//! ```sh
//! cargo run --bin train_model -- --coin ethereum --currency usd
//! ```

use anyhow::Result;
use clap::Parser;
use pricecast::application::ml::ModelTrainer;
use pricecast::config::Config;
use pricecast::infrastructure::coingecko::CoinGeckoMarketDataService;
use pricecast::infrastructure::persistence::model_store::ModelStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to output model file (defaults to MODEL_PATH)
    #[arg(long)]
    output: Option<PathBuf>,

    /// CoinGecko coin id (defaults to COIN_ID)
    #[arg(long)]
    coin: Option<String>,

    /// Quote currency (defaults to VS_CURRENCY)
    #[arg(long)]
    currency: Option<String>,

    /// Trailing window in days (defaults to HISTORY_DAYS)
    #[arg(long)]
    days: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;

    if let Some(output) = args.output {
        config.model.model_path = output;
    }
    if let Some(coin) = args.coin {
        config.market_data.coin_id = coin;
    }
    if let Some(currency) = args.currency {
        config.market_data.vs_currency = currency.to_lowercase();
    }
    if let Some(days) = args.days {
        anyhow::ensure!(days > 0, "--days must be at least 1");
        config.market_data.history_days = days;
    }

    let trainer = ModelTrainer::new(
        Arc::new(CoinGeckoMarketDataService::new(&config.market_data)),
        ModelStore::new(config.model.model_path.clone()),
        config.market_data.coin_id.clone(),
        config.market_data.vs_currency.clone(),
    );

    let samples = trainer.train().await?;
    info!(
        "Done. Model trained on {} samples saved to {:?}",
        samples,
        trainer.store().path()
    );
    Ok(())
}
