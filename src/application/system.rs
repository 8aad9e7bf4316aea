use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::application::ml::{ModelStatus, ModelTrainer};
use crate::application::prediction::Predictor;
use crate::config::Config;
use crate::domain::ports::PriceHistoryProvider;
use crate::domain::recommendation::TrendClassifier;
use crate::infrastructure::coingecko::CoinGeckoMarketDataService;
use crate::infrastructure::persistence::model_store::ModelStore;
use crate::interfaces::chart::ChartRenderer;
use crate::interfaces::http::{RequestHandler, build_router};

pub struct Application {
    pub config: Config,
    pub trainer: ModelTrainer,
    pub handler: Arc<RequestHandler>,
}

impl Application {
    pub fn build(config: Config) -> Result<Self> {
        let provider: Arc<dyn PriceHistoryProvider> =
            Arc::new(CoinGeckoMarketDataService::new(&config.market_data));
        Ok(Self::with_provider(config, provider))
    }

    /// Wires the application around an arbitrary history provider.
    pub fn with_provider(config: Config, provider: Arc<dyn PriceHistoryProvider>) -> Self {
        info!(
            "Building Pricecast Application ({}/{}, model at {:?})...",
            config.market_data.coin_id, config.market_data.vs_currency, config.model.model_path
        );

        let store = ModelStore::new(config.model.model_path.clone());
        let trainer = ModelTrainer::new(
            provider,
            store.clone(),
            config.market_data.coin_id.clone(),
            config.market_data.vs_currency.clone(),
        );

        let renderer = ChartRenderer::new(
            config.recommendation.chart_theme,
            config.market_data.vs_currency.clone(),
            &config.market_data.coin_id,
        );
        let handler = Arc::new(RequestHandler::new(
            Arc::new(store),
            Predictor::default(),
            TrendClassifier::new(config.recommendation.trend_threshold),
            renderer,
            config.market_data.vs_currency.clone(),
        ));

        Self {
            config,
            trainer,
            handler,
        }
    }

    /// Trains the model if no artifact exists. Failure is logged, not fatal:
    /// requests report a storage error until a model is available.
    pub async fn prepare_model(&self) -> Option<ModelStatus> {
        match self.trainer.ensure_model().await {
            Ok(status) => Some(status),
            Err(e) => {
                error!(
                    kind = e.kind(),
                    "Initial model training failed, serving without a model: {}", e
                );
                None
            }
        }
    }

    /// Ensures a model, then serves HTTP until Ctrl+C.
    pub async fn run(self) -> Result<()> {
        self.prepare_model().await;

        let address = self.config.server.socket_address();
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {}", address))?;
        info!("Listening on http://{}", address);

        axum::serve(listener, build_router(self.handler.clone()))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("Server stopped.");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received. Exiting...");
}
