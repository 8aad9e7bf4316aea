use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised anywhere along the fetch, train and predict pipeline
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("Market data fetch failed: {reason}")]
    UpstreamFetch { reason: String },

    #[error("Model storage error at {path:?}: {reason}")]
    Storage { path: PathBuf, reason: String },

    #[error("Model inference failed: {reason}")]
    Inference { reason: String },

    #[error("Prediction window starting {start} runs past the supported calendar")]
    DateOutOfRange { start: NaiveDate },

    #[error("Model training failed: {reason}")]
    Training { reason: String },
}

impl PredictionError {
    /// Stable code used in logs and in the generic error page.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDate { .. } => "invalid_date",
            Self::UpstreamFetch { .. } => "upstream_fetch_error",
            Self::Storage { .. } => "storage_error",
            Self::Inference { .. } => "inference_error",
            Self::DateOutOfRange { .. } => "date_out_of_range",
            Self::Training { .. } => "training_error",
        }
    }

    /// True when the error was caused by the user's input rather than the pipeline.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidDate { .. })
    }
}
