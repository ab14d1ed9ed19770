//! Insights and forecasting reports for a monthly SaaS metrics CSV.
//!
//! Usage:
//!   `saas_analysis insights [--input FILE] [--output-dir DIR]`
//!   `saas_analysis forecast [--input FILE] [--output-dir DIR] [--config FILE]`

use clap::{Args, Parser, Subcommand};
use saas_forecast::columns;
use saas_forecast::config::AnalysisConfig;
use saas_forecast::data::{DataLoader, MetricTable};
use saas_forecast::derive::derive_metrics;
use saas_forecast::error::Result;
use saas_forecast::insights::InsightSummary;
use saas_forecast::models::ForecastResult;
use saas_forecast::pipeline::ForecastPipeline;
use saas_forecast::projection::{cash_flow_forecast, profit_forecast, LastObserved};
use saas_forecast::report::{charts, Chart, ChartSink, PngChartRenderer};
use saas_forecast::sensitivity::SensitivitySweep;
use saas_forecast::utils::{month_label, months_after};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, warn};

const SENSITIVITY_CSV: &str = "sensitivity_results.csv";

#[derive(Parser, Debug)]
#[command(name = "saas_analysis")]
#[command(about = "Descriptive insights and forecasts for monthly SaaS metrics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print summary statistics and write the insights charts
    Insights(CommonArgs),
    /// Run the forecasting models, projections and sensitivity sweep
    Forecast {
        #[command(flatten)]
        common: CommonArgs,

        /// JSON file overriding the default analysis settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Input CSV file
    #[arg(short, long, default_value = "saas_dataset.csv")]
    input: PathBuf,

    /// Directory for charts and tables
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn load(input: &Path) -> Result<MetricTable> {
    let table = derive_metrics(&DataLoader::from_csv(input)?)?;
    info!(rows = table.len(), "loaded {}", input.display());
    Ok(table)
}

fn save(renderer: &mut PngChartRenderer, chart: &Chart, description: &str) -> Result<()> {
    renderer.render(chart)?;
    println!(
        "{} plot saved as '{}'.",
        description,
        renderer.path_for(chart).display()
    );
    Ok(())
}

fn print_forecast(forecast: &ForecastResult) {
    println!("{} forecast:", forecast.model());
    let months = forecast.months().unwrap_or(&[]);
    for (month, value) in months.iter().zip(forecast.values()) {
        println!("  {}  {:>14.2}", month_label(*month), value);
    }
}

fn run_insights(args: &CommonArgs) -> Result<()> {
    let table = load(&args.input)?;

    let summary = InsightSummary::compute(&table)?;
    print!("{}", summary);

    let mut renderer = PngChartRenderer::new(&args.output_dir)?;
    for chart in charts::insight_charts(&table, &summary.segment_churn)? {
        let description = chart.title.clone();
        save(&mut renderer, &chart, &description)?;
    }

    Ok(())
}

fn run_forecast(args: &CommonArgs, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    let table = load(&args.input)?;
    let history = table.column_f64(columns::TOTAL_MRR)?;
    let mut renderer = PngChartRenderer::new(&args.output_dir)?;

    let report = ForecastPipeline::from_config(&config)?.run_table(&table)?;

    for forecast in report.successes() {
        print_forecast(forecast);
    }
    for (model, error) in report.failures() {
        println!("{} failed: {}", model, error);
    }

    if let Some(forecast) = report.forecast("ARIMA") {
        save(
            &mut renderer,
            &charts::arima_chart(table.months(), &history, forecast)?,
            "ARIMA forecast",
        )?;
    }
    if let Some(forecast) = report.forecast("GARCH") {
        save(&mut renderer, &charts::garch_chart(forecast)?, "GARCH volatility")?;
    }
    if let Some(forecast) = report.forecast("Holt-Winters") {
        save(
            &mut renderer,
            &charts::exp_smoothing_chart(table.months(), &history, forecast)?,
            "Exponential Smoothing forecast",
        )?;
    }
    if let Ok(decomposition) = &report.decomposition {
        save(
            &mut renderer,
            &charts::decomposition_chart(table.months(), decomposition),
            "Seasonal decomposition",
        )?;
    }

    let last = LastObserved::from_table(&table)?;

    match report.revenue_forecast() {
        Some(revenue) => {
            let profit = profit_forecast(revenue.values(), &last);
            let cash_flow = cash_flow_forecast(revenue.values(), &last);
            save(
                &mut renderer,
                &charts::profit_chart(&report.months, &profit),
                "Profit forecast",
            )?;
            save(
                &mut renderer,
                &charts::cash_flow_chart(&report.months, &cash_flow),
                "Cash Flow forecast",
            )?;
        }
        None => warn!("no revenue forecast available, skipping profit and cash-flow projections"),
    }

    let sweep = SensitivitySweep::new(config.scenario_grid()?, config.horizon)?;
    let results = sweep.run(&last);
    let months = months_after(table.last_month()?, config.horizon)?;

    let csv_path = args.output_dir.join(SENSITIVITY_CSV);
    results.write_csv(&csv_path, &months)?;
    println!("Sensitivity results saved as '{}'.", csv_path.display());

    save(
        &mut renderer,
        &charts::sensitivity_chart(&months, &results),
        "Sensitivity Analysis",
    )?;

    Ok(())
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let outcome = match &cli.command {
        Command::Insights(args) => run_insights(args),
        Command::Forecast { common, config } => run_forecast(common, config.as_deref()),
    };

    if let Err(e) = outcome {
        error!("{}", e);
        process::exit(1);
    }
}
