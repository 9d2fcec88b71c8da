use crate::error::{ForecastError, Result};
use crate::{CycleLength, PerformanceReport};
use log::debug;

/// Score predictions against observed cycle lengths.
///
/// All metrics are produced together or not at all: a zero true value makes
/// MAPE (and therefore accuracy) undefined and fails the whole report.
pub fn compute_metrics(
    actual: &[CycleLength],
    predicted: &[f64],
    tolerance_days: f64,
) -> Result<PerformanceReport> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData(
            "no held-out cycles to evaluate".to_string(),
        ));
    }
    if let Some(index) = actual.iter().position(|&y| y == 0) {
        return Err(ForecastError::UndefinedMetric { index });
    }

    let n = actual.len() as f64;
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(&y, &y_hat)| y as f64 - y_hat)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt();
    let mape = errors
        .iter()
        .zip(actual)
        .map(|(e, &y)| (e / y as f64).abs())
        .sum::<f64>()
        / n
        * 100.0;
    let within = errors.iter().filter(|e| e.abs() <= tolerance_days).count();
    let tolerance_accuracy = within as f64 / n * 100.0;

    debug!(
        "Evaluated {} predictions: MAE {:.3}, RMSE {:.3}, MAPE {:.3}%, {} within ±{} days",
        actual.len(),
        mae,
        rmse,
        mape,
        within,
        tolerance_days
    );

    Ok(PerformanceReport {
        mae,
        rmse,
        mape,
        accuracy: 100.0 - mape,
        tolerance_accuracy,
        tolerance_days,
        samples: actual.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn perfect_predictions() {
        let report = compute_metrics(&[28, 30, 29], &[28.0, 30.0, 29.0], 3.0).unwrap();
        assert_eq!(report.mae, 0.0);
        assert_eq!(report.rmse, 0.0);
        assert_eq!(report.mape, 0.0);
        assert_eq!(report.accuracy, 100.0);
        assert_eq!(report.tolerance_accuracy, 100.0);
        assert_eq!(report.samples, 3);
    }

    #[test]
    fn known_errors() {
        // errors: 2, -4
        let report = compute_metrics(&[20, 40], &[18.0, 44.0], 3.0).unwrap();
        assert!(approx(report.mae, 3.0));
        assert!(approx(report.rmse, 10.0_f64.sqrt()));
        // (2/20 + 4/40) / 2 * 100 = 10
        assert!(approx(report.mape, 10.0));
        assert!(approx(report.accuracy, 90.0));
        assert!(approx(report.tolerance_accuracy, 50.0));
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let report = compute_metrics(&[30, 30], &[27.0, 33.0], 3.0).unwrap();
        assert_eq!(report.tolerance_accuracy, 100.0);
    }

    #[test]
    fn zero_true_value_fails_whole_report() {
        assert_eq!(
            compute_metrics(&[28, 0, 30], &[28.0, 29.0, 30.0], 3.0),
            Err(ForecastError::UndefinedMetric { index: 1 })
        );
    }

    #[test]
    fn empty_and_mismatched_inputs() {
        assert!(matches!(
            compute_metrics(&[], &[], 3.0),
            Err(ForecastError::InsufficientData(_))
        ));
        assert_eq!(
            compute_metrics(&[28], &[28.0, 29.0], 3.0),
            Err(ForecastError::LengthMismatch {
                actual: 1,
                predicted: 2
            })
        );
    }
}
