use crate::error::{ForecastError, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_WINDOW: usize = 12;
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;
pub const DEFAULT_TOLERANCE_DAYS: f64 = 3.0;
pub const DEFAULT_CYCLES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text, // default
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid output format: {}. Use 'text' (default) or 'json'",
                s
            )),
        }
    }
}

/// Forecast cycle start dates from a history of recorded start dates
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV file with a `start_date` column
    #[arg(long, env = "CYCLE_DATA_FILE", default_value = "startDates.csv")]
    pub data: PathBuf,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ModelArgs {
    /// Moving average window (number of most recent cycles averaged)
    #[arg(long, global = true, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    /// Fraction of cycle lengths used as training history (0.0 exclusive to 1.0)
    #[arg(long, global = true, default_value_t = DEFAULT_TRAIN_RATIO)]
    pub train_ratio: f64,

    /// Error tolerance in days for the tolerance accuracy metric
    #[arg(long, global = true, default_value_t = DEFAULT_TOLERANCE_DAYS)]
    pub tolerance: f64,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show recorded cycle lengths
    Series {
        /// Write the (date, cycle_length) series to this CSV file
        #[arg(long)]
        csv_output: Option<PathBuf>,
    },

    /// Walk-forward evaluation of the moving average on held-out cycles
    Evaluate {
        /// Write actual vs predicted lengths to this CSV file
        #[arg(long)]
        csv_output: Option<PathBuf>,
    },

    /// Predict the next cycle start dates
    Forecast {
        /// Number of future cycles to predict
        #[arg(long, short = 'n', default_value_t = DEFAULT_CYCLES)]
        cycles: usize,

        /// Treat this date (YYYY-MM-DD) as the next observed start without saving it
        #[arg(long)]
        override_date: Option<String>,

        /// Write the forecast line (date, cycle_length) to this CSV file
        #[arg(long)]
        csv_output: Option<PathBuf>,
    },

    /// Record a new cycle start date
    Override {
        /// New cycle start date (YYYY-MM-DD)
        date: String,

        /// Append the date to the data file (otherwise only preview it)
        #[arg(long)]
        confirm: bool,
    },
}

/// Model parameters passed to every core computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    pub window: usize,
    pub train_ratio: f64,
    pub tolerance_days: f64,
    pub cycles: usize,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            train_ratio: DEFAULT_TRAIN_RATIO,
            tolerance_days: DEFAULT_TOLERANCE_DAYS,
            cycles: DEFAULT_CYCLES,
        }
    }
}

impl ForecastParams {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(ForecastError::InvalidParameter {
                name: "window",
                reason: "must be a positive integer".to_string(),
            });
        }
        if !(self.train_ratio > 0.0 && self.train_ratio <= 1.0) {
            return Err(ForecastError::InvalidParameter {
                name: "train_ratio",
                reason: format!("must be in (0, 1], got {}", self.train_ratio),
            });
        }
        if !self.tolerance_days.is_finite() || self.tolerance_days < 0.0 {
            return Err(ForecastError::InvalidParameter {
                name: "tolerance",
                reason: format!(
                    "must be a non-negative number of days, got {}",
                    self.tolerance_days
                ),
            });
        }
        Ok(())
    }
}

impl From<&ModelArgs> for ForecastParams {
    fn from(args: &ModelArgs) -> Self {
        Self {
            window: args.window,
            train_ratio: args.train_ratio,
            tolerance_days: args.tolerance,
            ..Self::default()
        }
    }
}
