use crate::error::{ForecastError, Result};
use crate::CycleLength;
use log::trace;

/// Mean of the last `min(window, history.len())` values of `history`.
pub fn moving_average(history: &[f64], window: usize) -> Result<f64> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter {
            name: "window",
            reason: "must be a positive integer".to_string(),
        });
    }
    if history.is_empty() {
        return Err(ForecastError::InsufficientHistory);
    }

    let recent = &history[history.len().saturating_sub(window)..];
    Ok(recent.iter().sum::<f64>() / recent.len() as f64)
}

/// One-step-ahead predictions for every value of `test`.
///
/// After each prediction the observed test value, not the prediction, joins
/// the history used for the next step.
pub fn walk_forward_forecast(
    train: &[CycleLength],
    test: &[CycleLength],
    window: usize,
) -> Result<Vec<f64>> {
    let mut history: Vec<f64> = train.iter().map(|&v| v as f64).collect();
    let mut predictions = Vec::with_capacity(test.len());

    for (step, &actual) in test.iter().enumerate() {
        let predicted = moving_average(&history, window)?;
        trace!(
            "Walk-forward step {}: predicted {:.3}, actual {}",
            step,
            predicted,
            actual
        );
        predictions.push(predicted);
        history.push(actual as f64);
    }

    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_last_window_values() {
        assert_eq!(moving_average(&[4.0, 6.0, 8.0], 2).unwrap(), 7.0);
    }

    #[test]
    fn short_history_uses_everything() {
        assert_eq!(moving_average(&[4.0, 6.0, 8.0], 12).unwrap(), 6.0);
        assert_eq!(moving_average(&[30.0], 1).unwrap(), 30.0);
    }

    #[test]
    fn empty_history_is_an_error() {
        assert_eq!(
            moving_average(&[], 3),
            Err(ForecastError::InsufficientHistory)
        );
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            moving_average(&[1.0], 0),
            Err(ForecastError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn walk_forward_extends_with_true_values() {
        let predictions = walk_forward_forecast(&[10, 10, 10], &[12, 14], 3).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0], 10.0);
        // mean([10, 10, 12]), not mean([10, 10, 10])
        assert!((predictions[1] - 32.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn walk_forward_with_empty_test_predicts_nothing() {
        assert!(walk_forward_forecast(&[28, 30], &[], 12).unwrap().is_empty());
    }

    #[test]
    fn walk_forward_needs_training_history() {
        assert_eq!(
            walk_forward_forecast(&[], &[28], 12),
            Err(ForecastError::InsufficientHistory)
        );
    }
}
