use crate::data_loading::OverridePreview;
use crate::{CycleLength, CycleSeries, Evaluation, ForecastPoint, PerformanceReport, PointKind};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;
use std::io;
use std::path::Path;

pub fn format_report(report: &PerformanceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "MAE: {:.2}", report.mae);
    let _ = writeln!(out, "RMSE: {:.2}", report.rmse);
    let _ = writeln!(out, "MAPE: {:.2}%", report.mape);
    let _ = writeln!(out, "Accuracy: {:.2}%", report.accuracy);
    let _ = writeln!(
        out,
        "±{}-day Accuracy: {:.2}%",
        report.tolerance_days, report.tolerance_accuracy
    );
    out
}

pub fn format_forecast(points: &[ForecastPoint]) -> String {
    let mut out = String::new();
    for (i, point) in points.iter().enumerate() {
        let _ = write!(
            out,
            "Cycle {}: {} ({} days)",
            i + 1,
            point.start_date.format("%Y-%m-%d"),
            point.length
        );
        if point.kind == PointKind::Override {
            out.push_str(" [override]");
        }
        out.push('\n');
    }
    out
}

pub fn format_series(series: &CycleSeries) -> String {
    let mut out = String::new();
    for (date, length) in series.length_points() {
        let _ = writeln!(out, "{}  {:>3} days", date.format("%Y-%m-%d"), length);
    }
    out
}

pub fn format_override(preview: &OverridePreview) -> String {
    format!(
        "Last recorded cycle start date: {}\nComputed cycle length: {} days\n",
        preview.last_start.format("%Y-%m-%d"),
        preview.length
    )
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write `(date, cycle_length)` rows, the shape a line chart consumes.
pub fn write_length_series<W: io::Write>(
    writer: W,
    points: &[(NaiveDate, CycleLength)],
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["date", "cycle_length"])?;
    for (date, length) in points {
        writer.write_record(&[date.format("%Y-%m-%d").to_string(), length.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_evaluation<W: io::Write>(writer: W, evaluation: &Evaluation) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["actual", "predicted"])?;
    for (actual, predicted) in evaluation.actual.iter().zip(&evaluation.predicted) {
        writer.write_record(&[actual.to_string(), predicted.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Create `path` (and its parent directory) and hand it to `write`.
pub fn write_csv_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(std::fs::File) -> Result<()>,
{
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    println!("Writing results to {}", path.display());
    let file = std::fs::File::create(path)?;
    write(file)
}
