use crate::domain::types::PredictionSeries;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default price move (in the quote currency) separating BUY/SELL from HOLD.
/// Tunable via `TREND_THRESHOLD`; it is not derived from the data.
pub const DEFAULT_TREND_THRESHOLD: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
            Self::Hold => write!(f, "Hold"),
        }
    }
}

impl Action {
    pub fn color_hex(&self) -> &'static str {
        match self {
            Self::Buy => "#1E8E3E",
            Self::Sell => "#D93025",
            Self::Hold => "#808080",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendKind {
    SignificantRise,
    SlowRise,
    SignificantDrop,
    SlowDrop,
    Stable,
}

impl TrendKind {
    pub fn action(&self) -> Action {
        match self {
            Self::SignificantRise => Action::Buy,
            Self::SignificantDrop => Action::Sell,
            Self::SlowRise | Self::SlowDrop | Self::Stable => Action::Hold,
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            Self::SignificantRise => {
                "The price is predicted to increase significantly. It might be a good time to buy."
            }
            Self::SlowRise => "The price is predicted to rise slowly. Consider holding.",
            Self::SignificantDrop => {
                "The price is predicted to decrease significantly. It might be a good time to sell."
            }
            Self::SlowDrop => "The price is predicted to decrease slowly. Consider holding.",
            Self::Stable => "The price is expected to stay stable. It's best to hold.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    pub trend: TrendKind,
    pub rationale: String,
    /// last - first predicted price
    pub delta: f64,
}

/// Maps a prediction series to a BUY/SELL/HOLD recommendation using only
/// its first and last prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendClassifier {
    threshold: f64,
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TREND_THRESHOLD)
    }
}

impl TrendClassifier {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn classify(&self, series: &PredictionSeries) -> Recommendation {
        let delta = match (series.first(), series.last()) {
            (Some(first), Some(last)) => last.price - first.price,
            _ => 0.0,
        };
        let trend = self.trend_for_delta(delta);

        Recommendation {
            action: trend.action(),
            trend,
            rationale: trend.rationale().to_string(),
            delta,
        }
    }

    pub fn trend_for_delta(&self, delta: f64) -> TrendKind {
        if delta > self.threshold {
            TrendKind::SignificantRise
        } else if delta > 0.0 {
            TrendKind::SlowRise
        } else if delta < -self.threshold {
            TrendKind::SignificantDrop
        } else if delta < 0.0 {
            TrendKind::SlowDrop
        } else {
            TrendKind::Stable
        }
    }
}
