//! Error types for the saas_forecast crate

use saas_math::MathError;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the saas_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The tabular source could not be opened
    #[error("Cannot open input file '{}': {source}", path.display())]
    MissingInputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from the table
    #[error("Missing field: column '{0}' not found")]
    MissingField(String),

    /// A required column exists but does not hold the expected type
    #[error("Type mismatch: column '{column}' has type {found}, expected numeric")]
    TypeMismatch { column: String, found: String },

    /// A model was given less history than it needs
    #[error("Insufficient data for {model}: need at least {required} observations, have {actual}")]
    InsufficientData {
        model: String,
        required: usize,
        actual: usize,
    },

    /// A denominator was zero where no substitution policy applies
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error from the numeric building blocks
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error writing CSV output
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error reading the configuration file
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error producing a chart image
    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<polars::prelude::PolarsError> for ForecastError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl From<image::ImageError> for ForecastError {
    fn from(err: image::ImageError) -> Self {
        ForecastError::RenderError(err.to_string())
    }
}
