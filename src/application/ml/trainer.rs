use crate::application::ml::linear_model::LinearPriceModel;
use crate::domain::errors::PredictionError;
use crate::domain::features::FeatureVector;
use crate::domain::ports::PriceHistoryProvider;
use crate::infrastructure::persistence::model_store::{ModelArtifact, ModelStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of [`ModelTrainer::ensure_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    AlreadyPresent,
    Trained { samples: usize },
}

/// Fetches history, fits the regression and persists it.
pub struct ModelTrainer {
    provider: Arc<dyn PriceHistoryProvider>,
    store: ModelStore,
    coin_id: String,
    vs_currency: String,
}

impl ModelTrainer {
    pub fn new(
        provider: Arc<dyn PriceHistoryProvider>,
        store: ModelStore,
        coin_id: impl Into<String>,
        vs_currency: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            store,
            coin_id: coin_id.into(),
            vs_currency: vs_currency.into(),
        }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Fits a fresh model and overwrites the stored artifact unconditionally.
    /// Returns the number of samples used.
    pub async fn train(&self) -> Result<usize, PredictionError> {
        info!(
            "Training model from {} history ({}/{})",
            self.provider.name(),
            self.coin_id,
            self.vs_currency
        );

        let history = self
            .provider
            .fetch_history()
            .await
            .map_err(|e| PredictionError::UpstreamFetch {
                reason: format!("{:#}", e),
            })?;

        let features: Vec<FeatureVector> = history
            .iter()
            .map(|p| FeatureVector::from_timestamp(p.timestamp))
            .collect();
        let prices: Vec<f64> = history.iter().map(|p| p.price).collect();

        let model = LinearPriceModel::fit(&features, &prices)?;
        let artifact = ModelArtifact {
            trained_at: Utc::now(),
            coin_id: self.coin_id.clone(),
            vs_currency: self.vs_currency.clone(),
            samples: prices.len(),
            model,
        };
        self.store.save(&artifact)?;

        info!("Model trained on {} samples", artifact.samples);
        Ok(artifact.samples)
    }

    /// Trains only when no artifact exists yet.
    pub async fn ensure_model(&self) -> Result<ModelStatus, PredictionError> {
        if self.store.exists() {
            info!("Model artifact found at {:?}, skipping training", self.store.path());
            return Ok(ModelStatus::AlreadyPresent);
        }

        warn!(
            "No model artifact at {:?}, training a new one",
            self.store.path()
        );
        let samples = self.train().await?;
        Ok(ModelStatus::Trained { samples })
    }
}
