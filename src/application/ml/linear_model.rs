use crate::domain::errors::PredictionError;
use crate::domain::features::{FeatureVector, to_matrix_rows};
use crate::domain::ports::PriceModel;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};

type Regression = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Ordinary least squares of price on `(day, month, year)`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinearPriceModel {
    regression: Regression,
}

impl LinearPriceModel {
    /// Fits the model. Requires at least one sample and equal-length inputs.
    pub fn fit(features: &[FeatureVector], prices: &[f64]) -> Result<Self, PredictionError> {
        if features.is_empty() {
            return Err(PredictionError::Training {
                reason: "No training samples".to_string(),
            });
        }
        if features.len() != prices.len() {
            return Err(PredictionError::Training {
                reason: format!(
                    "Feature/target length mismatch: {} vs {}",
                    features.len(),
                    prices.len()
                ),
            });
        }

        let x = DenseMatrix::from_2d_vec(&to_matrix_rows(features)).map_err(|e| {
            PredictionError::Training {
                reason: format!("Matrix creation failed: {}", e),
            }
        })?;
        let y = prices.to_vec();

        // SVD tolerates the near-collinearity between the year column and the intercept
        let params =
            LinearRegressionParameters::default().with_solver(LinearRegressionSolverName::SVD);
        let regression =
            Regression::fit(&x, &y, params).map_err(|e| PredictionError::Training {
                reason: format!("Linear regression fit failed: {}", e),
            })?;

        Ok(Self { regression })
    }
}

impl PriceModel for LinearPriceModel {
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, PredictionError> {
        if features.is_empty() {
            return Ok(Vec::new());
        }

        let x = DenseMatrix::from_2d_vec(&to_matrix_rows(features)).map_err(|e| {
            PredictionError::Inference {
                reason: format!("Matrix creation failed: {}", e),
            }
        })?;

        let predictions = self
            .regression
            .predict(&x)
            .map_err(|e| PredictionError::Inference {
                reason: format!("Prediction failed: {}", e),
            })?;

        if let Some(bad) = predictions.iter().find(|p| !p.is_finite()) {
            return Err(PredictionError::Inference {
                reason: format!("Model produced a non-finite price: {}", bad),
            });
        }

        Ok(predictions)
    }

    fn name(&self) -> &str {
        "SmartCore Linear Regression"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    /// price = 10*day + 100*month + 1000*(year - 2023) + 5
    pub(crate) fn synthetic_dataset() -> (Vec<FeatureVector>, Vec<f64>) {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let features: Vec<FeatureVector> = (0..400)
            .map(|i| FeatureVector::from_date(start + Days::new(i)))
            .collect();
        let prices = features.iter().map(exact_price).collect();
        (features, prices)
    }

    pub(crate) fn exact_price(f: &FeatureVector) -> f64 {
        10.0 * f.day as f64 + 100.0 * f.month as f64 + 1000.0 * (f.year - 2023) as f64 + 5.0
    }

    #[test]
    fn test_fit_recovers_linear_relationship() {
        let (features, prices) = synthetic_dataset();
        let model = LinearPriceModel::fit(&features, &prices).unwrap();

        let probe = [
            FeatureVector { day: 15, month: 3, year: 2024 },
            FeatureVector { day: 1, month: 12, year: 2023 },
        ];
        let predicted = model.predict(&probe).unwrap();
        for (p, f) in predicted.iter().zip(probe.iter()) {
            assert!((p - exact_price(f)).abs() < 1.0, "{} vs {}", p, exact_price(f));
        }
    }

    #[test]
    fn test_fit_rejects_empty_input() {
        let err = LinearPriceModel::fit(&[], &[]).unwrap_err();
        assert_eq!(err.kind(), "training_error");
    }

    #[test]
    fn test_fit_rejects_length_mismatch() {
        let (features, _) = synthetic_dataset();
        let err = LinearPriceModel::fit(&features, &[1.0, 2.0]).unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn test_predict_is_deterministic() {
        let (features, prices) = synthetic_dataset();
        let model = LinearPriceModel::fit(&features, &prices).unwrap();
        let probe = [FeatureVector { day: 7, month: 7, year: 2024 }];
        assert_eq!(model.predict(&probe).unwrap(), model.predict(&probe).unwrap());
    }

    #[test]
    fn test_predict_empty_batch() {
        let (features, prices) = synthetic_dataset();
        let model = LinearPriceModel::fit(&features, &prices).unwrap();
        assert!(model.predict(&[]).unwrap().is_empty());
    }
}
