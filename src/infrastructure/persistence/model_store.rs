use crate::application::ml::linear_model::LinearPriceModel;
use crate::domain::errors::PredictionError;
use crate::domain::ports::{ModelSource, PriceModel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// The single persisted model plus a little provenance.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub trained_at: DateTime<Utc>,
    pub coin_id: String,
    pub vs_currency: String,
    pub samples: usize,
    pub model: LinearPriceModel,
}

/// File-backed store for the one authoritative model artifact.
#[derive(Debug, Clone)]
pub struct ModelStore {
    file_path: PathBuf,
}

impl ModelStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn exists(&self) -> bool {
        self.file_path.is_file()
    }

    fn storage_error(&self, reason: impl std::fmt::Display) -> PredictionError {
        PredictionError::Storage {
            path: self.file_path.clone(),
            reason: reason.to_string(),
        }
    }

    pub fn load(&self) -> Result<ModelArtifact, PredictionError> {
        let content = fs::read_to_string(&self.file_path)
            .map_err(|e| self.storage_error(format!("Failed to read model file: {}", e)))?;
        let artifact: ModelArtifact = serde_json::from_str(&content)
            .map_err(|e| self.storage_error(format!("Failed to deserialize model: {}", e)))?;

        debug!(
            "Loaded model from {:?} (trained {} on {} samples)",
            self.file_path, artifact.trained_at, artifact.samples
        );
        Ok(artifact)
    }

    /// Replaces any existing artifact. Last writer wins.
    pub fn save(&self, artifact: &ModelArtifact) -> Result<(), PredictionError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| self.storage_error(format!("Failed to create model directory: {}", e)))?;
        }

        let content = serde_json::to_string(artifact)
            .map_err(|e| self.storage_error(format!("Failed to serialize model: {}", e)))?;

        // Atomic write: write to temp file then rename
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content)
            .map_err(|e| self.storage_error(format!("Failed to write temp model file: {}", e)))?;
        fs::rename(&temp_path, &self.file_path)
            .map_err(|e| self.storage_error(format!("Failed to rename model file: {}", e)))?;

        info!(
            "Saved model to {:?} ({} samples)",
            self.file_path, artifact.samples
        );
        Ok(())
    }
}

impl ModelSource for ModelStore {
    fn current(&self) -> Result<Arc<dyn PriceModel>, PredictionError> {
        let artifact = self.load()?;
        Ok(Arc::new(artifact.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::linear_model::tests::synthetic_dataset;
    use crate::domain::features::FeatureVector;

    fn artifact() -> ModelArtifact {
        let (features, prices) = synthetic_dataset();
        ModelArtifact {
            trained_at: Utc::now(),
            coin_id: "bitcoin".to_string(),
            vs_currency: "inr".to_string(),
            samples: features.len(),
            model: LinearPriceModel::fit(&features, &prices).unwrap(),
        }
    }

    #[test]
    fn test_round_trip_preserves_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("nested").join("model.json"));
        let artifact = artifact();
        let probe = [
            FeatureVector { day: 1, month: 1, year: 2024 },
            FeatureVector { day: 28, month: 2, year: 2025 },
        ];
        let expected = artifact.model.predict(&probe).unwrap();

        assert!(!store.exists());
        store.save(&artifact).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.samples, artifact.samples);
        let actual = loaded.model.predict(&probe).unwrap();
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-6, "{} vs {}", a, e);
        }
    }

    #[test]
    fn test_missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("absent.json"));
        let err = store.current().err().unwrap();
        assert_eq!(err.kind(), "storage_error");
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{not json").unwrap();
        let err = ModelStore::new(path).load().unwrap_err();
        assert!(err.to_string().contains("deserialize"));
    }

    #[test]
    fn test_save_overwrites_previous_model() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));

        let mut first = artifact();
        first.samples = 1;
        store.save(&first).unwrap();
        store.save(&artifact()).unwrap();

        assert_eq!(store.load().unwrap().samples, 400);
        assert!(!dir.path().join("model.tmp").exists());
    }
}
