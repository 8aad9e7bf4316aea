use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of consecutive days produced by a single prediction.
pub const PREDICTION_HORIZON_DAYS: usize = 7;

/// One observed daily price from the market data source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Date-ascending predicted prices, one per calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionSeries {
    points: Vec<PredictionPoint>,
}

impl PredictionSeries {
    pub fn new(points: Vec<PredictionPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PredictionPoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PredictionPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PredictionPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}

impl FromIterator<PredictionPoint> for PredictionSeries {
    fn from_iter<I: IntoIterator<Item = PredictionPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_accessors() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series: PredictionSeries = (0..3)
            .map(|i| PredictionPoint {
                date: start + chrono::Days::new(i),
                price: 100.0 + i as f64,
            })
            .collect();

        assert_eq!(series.len(), 3);
        assert_eq!(series.first().unwrap().price, 100.0);
        assert_eq!(series.last().unwrap().price, 102.0);
        assert_eq!(series.prices(), vec![100.0, 101.0, 102.0]);
        assert_eq!(series.dates()[2], NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_empty_series() {
        let series = PredictionSeries::default();
        assert!(series.is_empty());
        assert!(series.first().is_none());
        assert!(series.last().is_none());
    }
}
