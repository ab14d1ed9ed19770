//! Generate a synthetic SaaS metrics dataset.
//!
//! Usage: `generate_dataset [--output FILE] [--start YYYY-MM] [--months N] [--seed N]`

use clap::Parser;
use saas_dataset::{write_csv, DatasetGenerator};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "generate_dataset")]
#[command(about = "Generate a synthetic monthly SaaS metrics CSV")]
struct Args {
    /// Output CSV file
    #[arg(short, long, default_value = "saas_dataset.csv")]
    output: PathBuf,

    /// First month, as YYYY-MM
    #[arg(long, default_value = "2019-01")]
    start: String,

    /// Number of months to generate
    #[arg(short, long, default_value_t = 60)]
    months: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn parse_start(start: &str) -> Option<(i32, u32)> {
    let (year, month) = start.split_once('-')?;
    Some((year.parse().ok()?, month.parse().ok()?))
}

fn main() {
    init_logging();

    let args = Args::parse();

    let Some((year, month)) = parse_start(&args.start) else {
        error!("Invalid --start '{}', expected YYYY-MM", args.start);
        process::exit(1);
    };

    let generator = match DatasetGenerator::new(year, month, args.months) {
        Ok(generator) => match args.seed {
            Some(seed) => generator.with_seed(seed),
            None => generator,
        },
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let records = match generator.generate() {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to generate dataset: {}", e);
            process::exit(1);
        }
    };
    info!(rows = records.len(), "generated dataset");

    if let Err(e) = write_csv(&args.output, &records) {
        error!("Failed to write {}: {}", args.output.display(), e);
        process::exit(1);
    }

    println!(
        "SaaS dataset generated and saved to '{}'.",
        args.output.display()
    );
}
