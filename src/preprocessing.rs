use crate::{CycleLength, CycleSeries, Split};
use chrono::NaiveDate;
use log::{debug, warn};

/// Sort start dates and derive the cycle length between each consecutive pair.
///
/// Duplicate dates are kept and produce zero-length cycles. With fewer than two
/// dates the length sequence is empty.
pub fn build_series(mut dates: Vec<NaiveDate>) -> CycleSeries {
    dates.sort_unstable();

    let lengths: Vec<CycleLength> = dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect();

    if lengths.is_empty() {
        warn!(
            "Only {} start date(s) recorded, no cycle lengths available",
            dates.len()
        );
    } else {
        debug!(
            "Built {} cycle lengths from {} start dates ({} to {})",
            lengths.len(),
            dates.len(),
            dates[0],
            dates[dates.len() - 1]
        );
    }

    CycleSeries { dates, lengths }
}

/// Chronological split at `floor(len * train_ratio)`.
///
/// The ratio is expected in (0, 1]; the split index is clamped to the sequence
/// length so the test half may be empty.
pub fn train_test_split(lengths: &[CycleLength], train_ratio: f64) -> Split<'_> {
    let train_size = ((lengths.len() as f64 * train_ratio).floor() as usize).min(lengths.len());
    let (train, test) = lengths.split_at(train_size);
    debug!(
        "Split {} cycle lengths into {} train / {} test (ratio {})",
        lengths.len(),
        train.len(),
        test.len(),
        train_ratio
    );
    Split { train, test }
}
