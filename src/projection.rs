use crate::data_loading::parse_start_date;
use crate::error::{ForecastError, Result};
use crate::forecasting::moving_average;
use crate::{CycleLength, ForecastPoint, PointKind};
use chrono::{Duration, NaiveDate};
use log::{debug, trace};

/// Parse user-supplied override text into a start date.
pub fn parse_override_date(input: &str) -> Result<NaiveDate> {
    parse_start_date(input).ok_or_else(|| ForecastError::InvalidOverrideDate {
        input: input.trim().to_string(),
        reason: "expected a date formatted YYYY-MM-DD".to_string(),
    })
}

/// Length of the cycle closed by `date`, which must come after `last_start`.
pub fn override_length(last_start: NaiveDate, date: NaiveDate) -> Result<CycleLength> {
    if date <= last_start {
        return Err(ForecastError::override_not_after(date, last_start));
    }
    Ok((date - last_start).num_days())
}

/// Predict the next `cycles` start dates.
///
/// Each prediction is the moving average of the working history. The history
/// grows by the unrounded prediction while the emitted point carries the
/// rounded length and the date it lands on. An override date, when present,
/// fills the first slot with its exact length and seeds the history with it.
pub fn project_cycles(
    history: &[CycleLength],
    last_start: NaiveDate,
    window: usize,
    cycles: usize,
    override_date: Option<NaiveDate>,
) -> Result<Vec<ForecastPoint>> {
    let mut working: Vec<f64> = history.iter().map(|&v| v as f64).collect();
    let mut cursor = last_start;
    let mut points = Vec::with_capacity(cycles);

    if let Some(date) = override_date {
        let length = override_length(cursor, date)?;
        if cycles > 0 {
            debug!("Override {} closes a {}-day cycle", date, length);
            points.push(ForecastPoint {
                start_date: date,
                length,
                kind: PointKind::Override,
            });
            working.push(length as f64);
            cursor = date;
        }
    }

    while points.len() < cycles {
        let predicted = moving_average(&working, window)?;
        let rounded = predicted.round_ties_even() as CycleLength;
        let next_start = Duration::try_days(rounded)
            .and_then(|d| cursor.checked_add_signed(d))
            .ok_or(ForecastError::DateOutOfRange {
                from: cursor,
                days: rounded,
            })?;
        trace!(
            "Projected cycle {}: {:.3} days -> {}",
            points.len() + 1,
            predicted,
            next_start
        );
        points.push(ForecastPoint {
            start_date: next_start,
            length: rounded,
            kind: PointKind::Predicted,
        });
        working.push(predicted);
        cursor = next_start;
    }

    Ok(points)
}
