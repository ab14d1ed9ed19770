//! # SaaS Metrics
//!
//! Umbrella crate for the SaaS metrics workspace.
//!
//! - [`dataset`]: synthetic monthly metrics and CSV round-tripping
//! - [`forecast`]: metric derivation, insights, forecasting and sensitivity analysis
//! - [`math`]: numeric building blocks shared by the models
//!
//! ## Example
//!
//! ```
//! use saas_metrics_workspace::dataset::DatasetGenerator;
//!
//! let records = DatasetGenerator::default().with_seed(1).generate().unwrap();
//! assert_eq!(records.len(), 60);
//! ```

pub use saas_dataset as dataset;
pub use saas_forecast as forecast;
pub use saas_math as math;

/// Version of the workspace crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
