//! Per-request state machine.
//!
//! `AwaitingInput -> Validating -> Predicting -> Responding`, with `Error`
//! reachable from `Validating` and `Predicting`. Nothing survives the request.

use crate::application::prediction::Predictor;
use crate::domain::errors::PredictionError;
use crate::domain::ports::ModelSource;
use crate::domain::recommendation::{Recommendation, TrendClassifier};
use crate::domain::types::PredictionSeries;
use crate::interfaces::chart::ChartRenderer;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Accepted input format for the `date` form field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const INVALID_DATE_MESSAGE: &str = "Please provide a valid date in 'YYYY-MM-DD' format.";

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub selected_date: NaiveDate,
    /// Last value of the series
    pub predicted_price: f64,
    pub currency: String,
    pub recommendation: Recommendation,
    pub series: PredictionSeries,
    pub chart_html: String,
}

/// What the user is shown when a request fails. Raw error text stays in the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub kind: &'static str,
    pub message: String,
    pub user_error: bool,
}

impl RequestError {
    pub fn from_prediction_error(err: &PredictionError) -> Self {
        if err.is_user_error() {
            return Self {
                kind: err.kind(),
                message: INVALID_DATE_MESSAGE.to_string(),
                user_error: true,
            };
        }
        Self::internal(err.kind())
    }

    pub fn internal(kind: &'static str) -> Self {
        Self {
            kind,
            message: format!(
                "An error occurred while generating the prediction. Please try again later. (ref: {})",
                kind
            ),
            user_error: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    AwaitingInput,
    Validating { raw_date: String },
    Predicting { start: NaiveDate },
    Responding(Box<PredictionView>),
    Error(RequestError),
}

impl RequestState {
    /// A form submission moves a fresh request into validation.
    pub fn submit(raw_date: impl Into<String>) -> Self {
        Self::Validating {
            raw_date: raw_date.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Responding(_) | Self::Error(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingInput => "AwaitingInput",
            Self::Validating { .. } => "Validating",
            Self::Predicting { .. } => "Predicting",
            Self::Responding(_) => "Responding",
            Self::Error(_) => "Error",
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, PredictionError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| PredictionError::InvalidDate {
        input: raw.to_string(),
    })
}

/// Runs the predict, classify and render pipeline for one submission.
pub struct RequestHandler {
    model_source: Arc<dyn ModelSource>,
    predictor: Predictor,
    classifier: TrendClassifier,
    renderer: ChartRenderer,
    currency: String,
}

impl RequestHandler {
    pub fn new(
        model_source: Arc<dyn ModelSource>,
        predictor: Predictor,
        classifier: TrendClassifier,
        renderer: ChartRenderer,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            model_source,
            predictor,
            classifier,
            renderer,
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Advances one transition. Terminal states and `AwaitingInput` are returned unchanged.
    pub fn step(&self, state: RequestState) -> RequestState {
        match state {
            RequestState::Validating { raw_date } => match parse_date(&raw_date) {
                Ok(start) => RequestState::Predicting { start },
                Err(e) => {
                    warn!(kind = e.kind(), "Rejected date input: {}", e);
                    RequestState::Error(RequestError::from_prediction_error(&e))
                }
            },
            RequestState::Predicting { start } => match self.run_pipeline(start) {
                Ok(view) => RequestState::Responding(Box::new(view)),
                Err(e) => {
                    error!(kind = e.kind(), "Prediction pipeline failed for {}: {}", start, e);
                    RequestState::Error(RequestError::from_prediction_error(&e))
                }
            },
            other => other,
        }
    }

    /// Drives a submitted date through the state machine to a terminal state.
    pub fn handle_submission(&self, raw_date: &str) -> RequestState {
        let mut state = RequestState::submit(raw_date);
        while !state.is_terminal() {
            state = self.step(state);
        }
        state
    }

    fn run_pipeline(&self, start: NaiveDate) -> Result<PredictionView, PredictionError> {
        let model = self.model_source.current()?;
        let series = self.predictor.predict(model.as_ref(), start)?;
        let recommendation = self.classifier.classify(&series);
        let chart_html = self.renderer.render(&series);

        let predicted_price = series
            .last()
            .map(|p| p.price)
            .ok_or_else(|| PredictionError::Inference {
                reason: "Empty prediction series".to_string(),
            })?;

        info!(
            "Prediction from {}: {:.2} {} -> {} ({:?}, delta {:.2})",
            start,
            predicted_price,
            self.currency.to_uppercase(),
            recommendation.action,
            recommendation.trend,
            recommendation.delta
        );

        Ok(PredictionView {
            selected_date: start,
            predicted_price,
            currency: self.currency.clone(),
            recommendation,
            series,
            chart_html,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::features::FeatureVector;
    use crate::domain::ports::PriceModel;
    use crate::domain::recommendation::Action;
    use crate::interfaces::chart::ChartTheme;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// price = 1000 * day_of_month
    pub(crate) struct DayModel;

    impl PriceModel for DayModel {
        fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, PredictionError> {
            Ok(features.iter().map(|f| 1000.0 * f.day as f64).collect())
        }

        fn name(&self) -> &str {
            "day-model"
        }
    }

    /// Counts how often the pipeline asked for a model.
    pub(crate) struct CountingSource {
        pub calls: AtomicUsize,
        pub fail: bool,
    }

    impl CountingSource {
        pub(crate) fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl ModelSource for CountingSource {
        fn current(&self) -> Result<Arc<dyn PriceModel>, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PredictionError::Storage {
                    path: "/secret/path/model.json".into(),
                    reason: "No such file or directory".to_string(),
                });
            }
            Ok(Arc::new(DayModel))
        }
    }

    pub(crate) fn handler(source: Arc<CountingSource>) -> RequestHandler {
        RequestHandler::new(
            source,
            Predictor::default(),
            TrendClassifier::default(),
            ChartRenderer::new(ChartTheme::Light, "inr", "bitcoin"),
            "inr",
        )
    }

    #[test]
    fn test_valid_date_reaches_responding() {
        let source = Arc::new(CountingSource::new(false));
        let state = handler(source.clone()).handle_submission("2024-01-01");

        let view = match state {
            RequestState::Responding(view) => view,
            other => panic!("expected Responding, got {:?}", other),
        };
        assert_eq!(view.selected_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(view.series.len(), 7);
        assert_eq!(view.predicted_price, 7000.0);
        // 1000 -> 7000 clears the default 5000 threshold
        assert_eq!(view.recommendation.action, Action::Buy);
        assert!(view.chart_html.contains("Plotly.newPlot"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_malformed_dates_never_reach_predictor() {
        for raw in ["2024/01/01", "not-a-date", "", "2024-13-01", "2024-02-30"] {
            let source = Arc::new(CountingSource::new(false));
            let state = handler(source.clone()).handle_submission(raw);

            match state {
                RequestState::Error(err) => {
                    assert!(err.user_error);
                    assert_eq!(err.message, INVALID_DATE_MESSAGE);
                }
                other => panic!("expected Error for {:?}, got {:?}", raw, other),
            }
            assert_eq!(source.calls.load(Ordering::SeqCst), 0, "input {:?}", raw);
        }
    }

    #[test]
    fn test_pipeline_failure_hides_raw_error() {
        let source = Arc::new(CountingSource::new(true));
        let state = handler(source).handle_submission("2024-01-01");

        let err = match state {
            RequestState::Error(err) => err,
            other => panic!("expected Error, got {:?}", other),
        };
        assert!(!err.user_error);
        assert_eq!(err.kind, "storage_error");
        assert!(err.message.contains("storage_error"));
        assert!(!err.message.contains("/secret/path"));
    }

    #[test]
    fn test_step_transitions() {
        let h = handler(Arc::new(CountingSource::new(false)));

        let state = h.step(RequestState::submit("2024-03-10"));
        assert_eq!(state.name(), "Predicting");
        let state = h.step(state);
        assert_eq!(state.name(), "Responding");
        assert!(state.is_terminal());

        assert_eq!(h.step(RequestState::AwaitingInput), RequestState::AwaitingInput);
        assert!(!RequestState::AwaitingInput.is_terminal());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("29-02-2024").is_err());
    }
}
