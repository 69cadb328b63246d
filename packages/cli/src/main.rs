#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for loading CTA ridership datasets.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use cta_ridership::RidershipError;
use cta_ridership::export::{write_csv, write_json};
use cta_ridership::loader::RidershipLoader;
use cta_ridership_models::{DEFAULT_MAX_RECORDS, DatasetChoice, LoaderConfig, RidershipData};
use strum::IntoEnumIterator;

#[derive(Parser)]
#[command(name = "cta_ridership", about = "CTA ridership data loader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a dataset and write it out.
    ///
    /// Warnings (early stops, empty results) are logged by default; set
    /// `RUST_LOG=info` for per-page progress.
    Load {
        /// Dataset to load (`daily_total` or `stations`)
        #[arg(long, default_value = "daily_total")]
        dataset: String,
        /// Maximum number of records to fetch
        #[arg(long, default_value_t = DEFAULT_MAX_RECORDS)]
        max_records: u64,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Override the dataset's API endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// List the known datasets
    Datasets,
}

/// Log filter used when `RUST_LOG` is unset, so truncated fetches are visible.
const DEFAULT_LOG_FILTER: &str = "warn";

fn log_filter(rust_log: Option<String>) -> String {
    rust_log
        .filter(|filter| !filter.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn init_logger() {
    pretty_env_logger::formatted_builder()
        .parse_filters(&log_filter(std::env::var("RUST_LOG").ok()))
        .init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn write_output(
    data: &RidershipData,
    format: OutputFormat,
    writer: impl Write,
) -> Result<(), RidershipError> {
    match format {
        OutputFormat::Csv => write_csv(data, writer),
        OutputFormat::Json => write_json(data, writer),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Datasets => {
            println!("{:<14} ENDPOINT", "DATASET");
            println!("{}", "-".repeat(70));
            for choice in DatasetChoice::iter() {
                println!("{:<14} {}", choice.to_string(), choice.api_url());
            }
        }
        Commands::Load {
            dataset,
            max_records,
            format,
            output,
            endpoint,
        } => {
            let start = Instant::now();

            let mut config = LoaderConfig::from_choice_name(&dataset, max_records);
            if config.is_empty() {
                log::warn!("Unknown dataset: {dataset}");
            }
            if let Some(url) = endpoint {
                config = config.with_endpoint(&url);
            }

            let loader = RidershipLoader::with_config(config).cached();
            let Some(data) = loader.dataset()? else {
                log::warn!("No {dataset} data loaded");
                return Ok(());
            };

            match output {
                Some(path) => {
                    let file = BufWriter::new(File::create(&path)?);
                    write_output(data, format, file)?;
                    log::info!("Wrote {} rows to {}", data.len(), path.display());
                }
                None => write_output(data, format, std::io::stdout().lock())?,
            }

            log::info!(
                "Loaded {} {dataset} rows in {:.1}s",
                data.len(),
                start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_shown_without_rust_log() {
        assert_eq!(log_filter(None), "warn");
        assert_eq!(log_filter(Some("  ".to_string())), "warn");
    }

    #[test]
    fn rust_log_overrides_default_filter() {
        assert_eq!(log_filter(Some("info".to_string())), "info");
        assert_eq!(
            log_filter(Some("cta_ridership=debug".to_string())),
            "cta_ridership=debug"
        );
    }

    #[test]
    fn parses_load_arguments() {
        let cli = Cli::parse_from(["cta_ridership", "load", "--dataset", "stations", "--format", "json"]);
        let Commands::Load {
            dataset,
            max_records,
            format,
            ..
        } = cli.command
        else {
            panic!("expected load command");
        };
        assert_eq!(dataset, "stations");
        assert_eq!(max_records, DEFAULT_MAX_RECORDS);
        assert_eq!(format, OutputFormat::Json);
    }
}
