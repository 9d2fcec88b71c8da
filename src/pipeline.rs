//! Request-level entry points. Each call recomputes its result from the
//! series and parameters it is given; nothing is cached between calls.

use crate::config::ForecastParams;
use crate::error::{ForecastError, Result};
use crate::evaluation::compute_metrics;
use crate::forecasting::walk_forward_forecast;
use crate::preprocessing::train_test_split;
use crate::projection::project_cycles;
use crate::{CycleLength, CycleSeries, Evaluation, ForecastPoint};
use chrono::NaiveDate;
use log::info;

/// Walk-forward evaluation of the moving average on the held-out tail of the
/// series.
pub fn evaluate_series(series: &CycleSeries, params: &ForecastParams) -> Result<Evaluation> {
    params.validate()?;
    if series.is_empty() {
        return Err(ForecastError::InsufficientData(format!(
            "need at least 2 start dates, got {}",
            series.dates.len()
        )));
    }

    let split = train_test_split(&series.lengths, params.train_ratio);
    if split.train.is_empty() {
        return Err(ForecastError::InsufficientData(format!(
            "training segment is empty ({} cycles at ratio {})",
            series.len(),
            params.train_ratio
        )));
    }
    if split.test.is_empty() {
        return Err(ForecastError::InsufficientData(format!(
            "test segment is empty ({} cycles at ratio {})",
            series.len(),
            params.train_ratio
        )));
    }

    let predicted = walk_forward_forecast(split.train, split.test, params.window)?;
    let report = compute_metrics(split.test, &predicted, params.tolerance_days)?;
    info!(
        "Evaluated window {} on {} held-out cycles",
        params.window, report.samples
    );

    Ok(Evaluation {
        report,
        actual: split.test.to_vec(),
        predicted,
    })
}

/// Project `params.cycles` future start dates from the end of the series.
pub fn forecast_series(
    series: &CycleSeries,
    params: &ForecastParams,
    override_date: Option<NaiveDate>,
) -> Result<Vec<ForecastPoint>> {
    params.validate()?;
    let last_start = match series.last_start() {
        Some(date) if !series.is_empty() => date,
        _ => {
            return Err(ForecastError::InsufficientData(format!(
                "need at least 2 start dates, got {}",
                series.dates.len()
            )))
        }
    };

    let points = project_cycles(
        &series.lengths,
        last_start,
        params.window,
        params.cycles,
        override_date,
    )?;
    info!(
        "Projected {} cycles from {} with window {}",
        points.len(),
        last_start,
        params.window
    );
    Ok(points)
}

/// Forecast line for charting: the last observed (date, length) point
/// followed by the forecast points.
pub fn forecast_chart(
    series: &CycleSeries,
    points: &[ForecastPoint],
) -> Vec<(NaiveDate, CycleLength)> {
    series
        .length_points()
        .last()
        .copied()
        .into_iter()
        .chain(points.iter().map(|p| (p.start_date, p.length)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::build_series;
    use crate::PointKind;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn series_from_lengths(start: &str, lengths: &[i64]) -> CycleSeries {
        let mut dates = vec![date(start)];
        for &len in lengths {
            let last = *dates.last().unwrap();
            dates.push(last + Duration::days(len));
        }
        build_series(dates)
    }

    #[test]
    fn evaluates_held_out_tail() {
        // 5 lengths at 0.6 -> train [10, 10, 10], test [12, 14]
        let series = series_from_lengths("2024-01-01", &[10, 10, 10, 12, 14]);
        let params = ForecastParams {
            window: 3,
            train_ratio: 0.6,
            ..ForecastParams::default()
        };
        let evaluation = evaluate_series(&series, &params).unwrap();
        assert_eq!(evaluation.actual, vec![12, 14]);
        assert_eq!(evaluation.predicted[0], 10.0);
        assert!((evaluation.predicted[1] - 32.0 / 3.0).abs() < 1e-12);
        assert_eq!(evaluation.report.samples, 2);
        // errors 2 and 3.333: only the first is within 3 days
        assert_eq!(evaluation.report.tolerance_accuracy, 50.0);
    }

    #[test]
    fn evaluation_reports_insufficient_data() {
        let params = ForecastParams::default();
        let single = build_series(vec![date("2024-01-01")]);
        assert!(matches!(
            evaluate_series(&single, &params),
            Err(ForecastError::InsufficientData(_))
        ));

        // one length: floor(1 * 0.8) = 0 -> empty train
        let one = series_from_lengths("2024-01-01", &[28]);
        assert!(matches!(
            evaluate_series(&one, &params),
            Err(ForecastError::InsufficientData(_))
        ));

        let all_train = ForecastParams {
            train_ratio: 1.0,
            ..params
        };
        let many = series_from_lengths("2024-01-01", &[28, 29, 30]);
        assert!(matches!(
            evaluate_series(&many, &all_train),
            Err(ForecastError::InsufficientData(_))
        ));
    }

    #[test]
    fn zero_length_cycle_in_test_is_undefined_metric() {
        let series = series_from_lengths("2024-01-01", &[28, 28, 28, 28, 0]);
        assert!(matches!(
            evaluate_series(&series, &ForecastParams::default()),
            Err(ForecastError::UndefinedMetric { .. })
        ));
    }

    #[test]
    fn forecast_requires_two_dates() {
        let single = build_series(vec![date("2024-01-01")]);
        assert!(matches!(
            forecast_series(&single, &ForecastParams::default(), None),
            Err(ForecastError::InsufficientData(_))
        ));
    }

    #[test]
    fn forecast_with_override() {
        let series = series_from_lengths("2023-12-04", &[28]);
        assert_eq!(series.last_start(), Some(date("2024-01-01")));

        let params = ForecastParams {
            cycles: 3,
            ..ForecastParams::default()
        };
        let points = forecast_series(&series, &params, Some(date("2024-01-30"))).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].kind, PointKind::Override);
        assert_eq!(points[0].length, 29);
        // mean([28, 29]) = 28.5 -> 28 (ties to even)
        assert_eq!(points[1].start_date, date("2024-02-27"));
    }

    #[test]
    fn chart_starts_at_last_observation() {
        let series = series_from_lengths("2024-01-01", &[28, 30]);
        let points = forecast_series(
            &series,
            &ForecastParams {
                cycles: 1,
                ..ForecastParams::default()
            },
            None,
        )
        .unwrap();
        let chart = forecast_chart(&series, &points);
        assert_eq!(
            chart,
            vec![(date("2024-02-28"), 30), (date("2024-03-28"), 29)]
        );
    }
}
