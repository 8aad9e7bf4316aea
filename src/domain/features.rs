//! Calendar features used as regression input.
//!
//! The model sees raw `(day, month, year)` integers. It has no notion of
//! periodicity, so predictions are a naive baseline only.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of columns produced by [`FeatureVector::to_row`].
pub const FEATURE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureVector {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl FeatureVector {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }

    /// Calendar fields are taken in UTC.
    pub fn from_timestamp(timestamp: DateTime<Utc>) -> Self {
        Self::from_date(timestamp.date_naive())
    }

    /// Returns `None` when the millisecond timestamp is outside chrono's range.
    pub fn from_timestamp_ms(timestamp_ms: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(Self::from_timestamp)
    }

    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [self.day as f64, self.month as f64, self.year as f64]
    }
}

/// Builds the design matrix rows for a batch of feature vectors.
pub fn to_matrix_rows(features: &[FeatureVector]) -> Vec<Vec<f64>> {
    features.iter().map(|f| f.to_row().to_vec()).collect()
}
