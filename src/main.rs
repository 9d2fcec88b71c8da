use anyhow::Context;
use clap::Parser;
use cycle_forecast::config::{Args, Command, ForecastParams, OutputFormat};
use cycle_forecast::data_loading::{confirm_override, load_records, preview_override};
use cycle_forecast::output;
use cycle_forecast::pipeline::{evaluate_series, forecast_chart, forecast_series};
use cycle_forecast::projection::parse_override_date;
use log::debug;

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let args = Args::parse();
    let params = ForecastParams::from(&args.model);
    debug!("Parameters: {:?}", params);

    let series = load_records(&args.data)
        .with_context(|| format!("Failed to load cycle data from {}", args.data.display()))?;
    debug!(
        "Loaded {} start dates ({} cycle lengths)",
        series.dates.len(),
        series.len()
    );

    match args.command {
        Command::Series { csv_output } => {
            match args.format {
                OutputFormat::Text => print!("{}", output::format_series(&series)),
                OutputFormat::Json => println!("{}", output::to_json(&series)?),
            }
            if let Some(path) = csv_output {
                let points = series.length_points();
                output::write_csv_file(&path, |file| output::write_length_series(file, &points))?;
            }
        }
        Command::Evaluate { csv_output } => {
            let evaluation = evaluate_series(&series, &params)?;
            match args.format {
                OutputFormat::Text => {
                    println!("Model Performance on Test Data");
                    print!("{}", output::format_report(&evaluation.report));
                }
                OutputFormat::Json => println!("{}", output::to_json(&evaluation)?),
            }
            if let Some(path) = csv_output {
                output::write_csv_file(&path, |file| output::write_evaluation(file, &evaluation))?;
            }
        }
        Command::Forecast {
            cycles,
            override_date,
            csv_output,
        } => {
            let override_date = override_date
                .as_deref()
                .map(parse_override_date)
                .transpose()?;
            let params = ForecastParams { cycles, ..params };
            let points = forecast_series(&series, &params, override_date)?;
            match args.format {
                OutputFormat::Text => {
                    println!("Predicted Next {} Cycles", points.len());
                    print!("{}", output::format_forecast(&points));
                }
                OutputFormat::Json => println!("{}", output::to_json(&points)?),
            }
            if let Some(path) = csv_output {
                let chart = forecast_chart(&series, &points);
                output::write_csv_file(&path, |file| output::write_length_series(file, &chart))?;
            }
        }
        Command::Override { date, confirm } => {
            let preview = if confirm {
                let preview = confirm_override(&args.data, &date)?;
                println!(
                    "Override saved! Added {} as new cycle start date.",
                    preview.start_date.format("%Y-%m-%d")
                );
                preview
            } else {
                preview_override(&series, &date)?
            };
            match args.format {
                OutputFormat::Text => {
                    print!("{}", output::format_override(&preview));
                    if !confirm {
                        println!("Re-run with --confirm to save this date.");
                    }
                }
                OutputFormat::Json => println!("{}", output::to_json(&preview)?),
            }
        }
    }

    Ok(())
}
