use crate::preprocessing::build_series;
use crate::projection::{override_length, parse_override_date};
use crate::{CycleLength, CycleSeries, ForecastError};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct StartDateRow {
    start_date: Option<String>,
}

#[derive(Debug, Serialize)]
struct StartDateOut {
    start_date: String,
}

/// Parse a start date written either as a plain date or as a timestamp, in
/// which case the time of day is dropped.
pub fn parse_start_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .ok()
                .map(|dt| dt.date())
        })
}

/// Read every `start_date` cell of the CSV at `path`, in file order.
pub fn read_start_dates(path: &Path) -> Result<Vec<NaiveDate>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open data file: {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = rdr.headers()?.clone();
    if !headers.iter().any(|h| h == "start_date") {
        anyhow::bail!("{} has no start_date column", path.display());
    }
    let mut dates = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: StartDateRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Malformed row at line {}", line))?;
        let Some(raw) = row.start_date.filter(|s| !s.is_empty()) else {
            debug!("Skipping blank start_date at line {}", line);
            continue;
        };
        let date = parse_start_date(&raw).with_context(|| {
            format!("Invalid start_date '{}' at line {} of {}", raw, line, path.display())
        })?;
        dates.push(date);
    }

    debug!("Read {} start dates from {}", dates.len(), path.display());
    Ok(dates)
}

/// Load the record store and derive its cycle series.
pub fn load_records(path: &Path) -> Result<CycleSeries> {
    Ok(build_series(read_start_dates(path)?))
}

/// Replace the contents of `path` with `dates`.
///
/// The rows are written to a temporary file next to the target which is then
/// renamed over it, so readers see either the old or the new list.
pub fn save_records(path: &Path, dates: &[NaiveDate]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        for date in dates {
            writer.serialize(StartDateOut {
                start_date: date.format(DATE_FORMAT).to_string(),
            })?;
        }
        if dates.is_empty() {
            writer.write_record(["start_date"])?;
        }
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace data file: {}", path.display()))?;

    debug!("Wrote {} start dates to {}", dates.len(), path.display());
    Ok(())
}

/// A validated override that has not been saved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverridePreview {
    pub last_start: NaiveDate,
    pub start_date: NaiveDate,
    pub length: CycleLength,
}

/// Check `input` against the last recorded start date and compute the cycle
/// length it would close.
pub fn preview_override(
    series: &CycleSeries,
    input: &str,
) -> Result<OverridePreview, ForecastError> {
    let last_start = series.last_start().ok_or_else(|| {
        ForecastError::InsufficientData("no recorded start date to override from".to_string())
    })?;
    let start_date = parse_override_date(input)?;
    let length = override_length(last_start, start_date)?;
    Ok(OverridePreview {
        last_start,
        start_date,
        length,
    })
}

/// Append a validated override date to the store at `path`.
///
/// The store is left untouched when the date is rejected.
pub fn confirm_override(path: &Path, input: &str) -> Result<OverridePreview> {
    let series = load_records(path)?;
    let preview = preview_override(&series, input)?;

    let mut dates = series.dates;
    dates.push(preview.start_date);
    save_records(path, &dates)?;

    info!(
        "Added {} as new cycle start date ({} days)",
        preview.start_date, preview.length
    );
    Ok(preview)
}
