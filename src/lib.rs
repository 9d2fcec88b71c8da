pub mod config;
pub mod data_loading;
pub mod error;
pub mod evaluation;
pub mod forecasting;
pub mod output;
pub mod pipeline;
pub mod preprocessing;
pub mod projection;

use chrono::NaiveDate;
use serde::Serialize;

pub use error::ForecastError;

/// Days between two consecutive cycle start dates.
pub type CycleLength = i64;

/// Sorted cycle start dates and the lengths derived from them.
///
/// `lengths[i]` is the span from `dates[i]` to `dates[i + 1]`, so there is
/// always one length fewer than there are dates (none for a single date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleSeries {
    pub dates: Vec<NaiveDate>,
    pub lengths: Vec<CycleLength>,
}

impl CycleSeries {
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn last_start(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Each cycle length paired with the start date that closes it.
    pub fn length_points(&self) -> Vec<(NaiveDate, CycleLength)> {
        self.dates
            .iter()
            .skip(1)
            .copied()
            .zip(self.lengths.iter().copied())
            .collect()
    }
}

/// Train/test partition of a length sequence. Both halves borrow from the
/// sequence and keep its chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub train: &'a [CycleLength],
    pub test: &'a [CycleLength],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    /// Supplied by the user; the length is exact.
    Override,
    Predicted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForecastPoint {
    pub start_date: NaiveDate,
    pub length: CycleLength,
    pub kind: PointKind,
}

/// The five accuracy figures of a walk-forward evaluation, in days or percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub mae: f64,
    pub rmse: f64,
    pub mape: f64,
    pub accuracy: f64,
    pub tolerance_accuracy: f64,
    pub tolerance_days: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub report: PerformanceReport,
    pub actual: Vec<CycleLength>,
    pub predicted: Vec<f64>,
}
