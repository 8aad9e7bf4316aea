use crate::domain::errors::PredictionError;
use crate::domain::features::FeatureVector;
use crate::domain::ports::PriceModel;
use crate::domain::types::{PREDICTION_HORIZON_DAYS, PredictionPoint, PredictionSeries};
use chrono::{Days, NaiveDate};
use tracing::debug;

/// Produces the daily price path starting at a given date.
#[derive(Debug, Clone, Copy)]
pub struct Predictor {
    horizon: usize,
}

impl Default for Predictor {
    fn default() -> Self {
        Self {
            horizon: PREDICTION_HORIZON_DAYS,
        }
    }
}

impl Predictor {
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// `start` is not range-checked; past and future dates are both accepted.
    pub fn prediction_dates(&self, start: NaiveDate) -> Result<Vec<NaiveDate>, PredictionError> {
        (0..self.horizon as u64)
            .map(|offset| {
                start
                    .checked_add_days(Days::new(offset))
                    .ok_or(PredictionError::DateOutOfRange { start })
            })
            .collect()
    }

    pub fn predict(
        &self,
        model: &dyn PriceModel,
        start: NaiveDate,
    ) -> Result<PredictionSeries, PredictionError> {
        let dates = self.prediction_dates(start)?;
        let features: Vec<FeatureVector> =
            dates.iter().copied().map(FeatureVector::from_date).collect();

        let prices = model.predict(&features)?;
        if prices.len() != dates.len() {
            return Err(PredictionError::Inference {
                reason: format!(
                    "{} returned {} prices for {} dates",
                    model.name(),
                    prices.len(),
                    dates.len()
                ),
            });
        }

        debug!("Predicted {} days from {} with {}", dates.len(), start, model.name());
        Ok(dates
            .into_iter()
            .zip(prices)
            .map(|(date, price)| PredictionPoint { date, price })
            .collect())
    }
}
