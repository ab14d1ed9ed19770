//! # SaaS Math
//!
//! Numeric building blocks shared by the forecasting models.
//! This crate provides the pieces the models are assembled from:
//! descriptive statistics, differencing, autoregressive estimation,
//! centered moving averages and a deterministic grid-search minimiser.

use thiserror::Error;

pub mod autoregression;
pub mod differencing;
pub mod moving_averages;
pub mod optimize;
pub mod statistics;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
