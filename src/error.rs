use chrono::NaiveDate;
use thiserror::Error;

/// Failures raised by the forecasting core.
///
/// Every variant is local to the request that produced it. Nothing here is
/// retried: the computations are deterministic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// Not enough observations to produce a forecast or a metric.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The moving average was asked for a prediction with no history.
    #[error("Moving average invoked with an empty history")]
    InsufficientHistory,

    /// MAPE is undefined because a true cycle length is zero.
    #[error("MAPE is undefined: true value at position {index} is zero")]
    UndefinedMetric { index: usize },

    #[error("Invalid override date '{input}': {reason}")]
    InvalidOverrideDate { input: String, reason: String },

    /// A projected start date falls outside the representable calendar.
    #[error("Projected start date is out of range: {days} days after {from}")]
    DateOutOfRange { from: NaiveDate, days: i64 },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Length mismatch: {actual} true values vs {predicted} predictions")]
    LengthMismatch { actual: usize, predicted: usize },
}

impl ForecastError {
    pub(crate) fn override_not_after(date: NaiveDate, last_start: NaiveDate) -> Self {
        ForecastError::InvalidOverrideDate {
            input: date.format("%Y-%m-%d").to_string(),
            reason: format!(
                "must be after the last recorded start date {}",
                last_start.format("%Y-%m-%d")
            ),
        }
    }
}

pub type Result<T, E = ForecastError> = std::result::Result<T, E>;
