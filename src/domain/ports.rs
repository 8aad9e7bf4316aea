use crate::domain::errors::PredictionError;
use crate::domain::features::FeatureVector;
use crate::domain::types::PricePoint;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of the trailing daily price history used for training.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn fetch_history(&self) -> Result<Vec<PricePoint>>;

    /// Human-readable source name for logs
    fn name(&self) -> &str;
}

/// A fitted model mapping calendar features to a price.
pub trait PriceModel: Send + Sync {
    /// Predict one price per feature vector, in input order.
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, PredictionError>;

    fn name(&self) -> &str;
}

/// Hands out the currently authoritative model.
pub trait ModelSource: Send + Sync {
    fn current(&self) -> Result<Arc<dyn PriceModel>, PredictionError>;
}
