//! # SaaS Forecast
//!
//! Metric derivation, forecasting and scenario analysis for monthly SaaS
//! metrics.
//!
//! ## Features
//!
//! - Monthly metric tables loaded from CSV (via polars)
//! - Derived columns: total subscribers, total MRR, customer lifetime value
//! - Descriptive insights: churn averages, segment churn, upsell success
//! - Forecasting models (ARIMA, GARCH, additive Holt-Winters) behind one trait
//! - Additive seasonal decomposition
//! - Profit and cash-flow projections
//! - Sensitivity sweep over marketing spend and churn assumptions
//! - PNG chart output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use saas_forecast::config::AnalysisConfig;
//! use saas_forecast::data::DataLoader;
//! use saas_forecast::derive::derive_metrics;
//! use saas_forecast::pipeline::ForecastPipeline;
//!
//! # fn main() -> saas_forecast::error::Result<()> {
//! let table = derive_metrics(&DataLoader::from_csv("saas_dataset.csv")?)?;
//!
//! let config = AnalysisConfig::default();
//! let report = ForecastPipeline::from_config(&config)?.run_table(&table)?;
//!
//! for (model, error) in report.failures() {
//!     eprintln!("{} failed: {}", model, error);
//! }
//! # Ok(())
//! # }
//! ```

pub mod columns;
pub mod config;
pub mod data;
pub mod derive;
pub mod error;
pub mod insights;
pub mod models;
pub mod pipeline;
pub mod projection;
pub mod report;
pub mod sensitivity;
pub mod utils;

// Re-export commonly used types
pub use crate::config::AnalysisConfig;
pub use crate::data::{DataLoader, MetricTable};
pub use crate::derive::derive_metrics;
pub use crate::error::ForecastError;
pub use crate::models::{ForecastKind, ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::pipeline::{ForecastPipeline, PipelineReport};
pub use crate::sensitivity::{ScenarioGrid, ScenarioKey, SensitivityResults, SensitivitySweep};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
