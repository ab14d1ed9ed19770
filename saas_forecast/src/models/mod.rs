//! Forecasting models for time series data
//!
//! Every technique implements [`ForecastModel`]: training on a history yields
//! a boxed [`TrainedForecastModel`] that can forecast any horizon. The
//! pipeline holds a list of `Box<dyn ForecastModel>` and treats them
//! uniformly.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// What the forecast values measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ForecastKind {
    /// Future values of the series itself
    Level,
    /// Future conditional variance of the series
    Variance,
}

/// Forecast result containing predicted values
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    /// Name of the model that produced the forecast
    model: String,
    /// Level or variance forecast
    kind: ForecastKind,
    /// Forecasted values
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Prediction intervals (optional)
    intervals: Option<Vec<(f64, f64)>>,
    /// Calendar months the values are aligned to (optional)
    months: Option<Vec<NaiveDate>>,
    /// Orders and fitted coefficients of the model
    parameters: BTreeMap<String, f64>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(
        model: impl Into<String>,
        kind: ForecastKind,
        values: Vec<f64>,
        horizons: usize,
    ) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::InvalidData(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            model: model.into(),
            kind,
            values,
            horizons,
            intervals: None,
            months: None,
            parameters: BTreeMap::new(),
        })
    }

    /// Attach prediction intervals, one `(lower, upper)` pair per value
    pub fn with_intervals(mut self, intervals: Vec<(f64, f64)>) -> Result<Self> {
        if self.values.len() != intervals.len() {
            return Err(ForecastError::InvalidData(format!(
                "Values length ({}) doesn't match intervals length ({})",
                self.values.len(),
                intervals.len()
            )));
        }

        self.intervals = Some(intervals);
        Ok(self)
    }

    /// Attach the model parameters
    pub fn with_parameters(mut self, parameters: BTreeMap<String, f64>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Align the values to calendar months
    pub fn aligned_to(mut self, months: Vec<NaiveDate>) -> Result<Self> {
        if months.len() != self.horizons {
            return Err(ForecastError::InvalidData(format!(
                "Cannot align {} forecast values to {} months",
                self.horizons,
                months.len()
            )));
        }

        self.months = Some(months);
        Ok(self)
    }

    /// Name of the model that produced the forecast
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Level or variance forecast
    pub fn kind(&self) -> ForecastKind {
        self.kind
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Get the prediction intervals, if available
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    /// Get the aligned months, if available
    pub fn months(&self) -> Option<&[NaiveDate]> {
        self.months.as_deref()
    }

    /// Model parameters by name
    pub fn parameters(&self) -> &BTreeMap<String, f64> {
        &self.parameters
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;

    /// Orders and fitted coefficients
    fn parameters(&self) -> BTreeMap<String, f64>;
}

/// Forecast model that can be trained on a univariate history
pub trait ForecastModel: Debug {
    /// Get the name of the model
    fn name(&self) -> &str;

    /// Shortest history the model accepts
    fn min_observations(&self) -> usize;

    /// Train the model on a history ordered oldest first
    fn train(&self, history: &[f64]) -> Result<Box<dyn TrainedForecastModel>>;
}

/// Reject histories that are too short or contain non-finite values
pub(crate) fn check_history(model: &str, required: usize, history: &[f64]) -> Result<()> {
    if history.len() < required {
        return Err(ForecastError::InsufficientData {
            model: model.to_string(),
            required,
            actual: history.len(),
        });
    }

    if let Some(position) = history.iter().position(|x| !x.is_finite()) {
        return Err(ForecastError::InvalidData(format!(
            "{}: observation {} is missing or not finite",
            model, position
        )));
    }

    Ok(())
}

/// Two-sided standard normal critical value for a confidence level
pub(crate) fn normal_critical_value(confidence_level: f64) -> Result<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(ForecastError::InvalidParameter(
            "Confidence level must be between 0 and 1".to_string(),
        ));
    }

    let normal =
        Normal::new(0.0, 1.0).map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

    Ok(normal.inverse_cdf(0.5 + confidence_level / 2.0))
}

/// Symmetric intervals `value ± z * sqrt(variance)`
pub(crate) fn symmetric_intervals(
    values: &[f64],
    variances: &[f64],
    critical_value: f64,
) -> Vec<(f64, f64)> {
    values
        .iter()
        .zip(variances.iter())
        .map(|(v, var)| {
            let margin = critical_value * var.max(0.0).sqrt();
            (v - margin, v + margin)
        })
        .collect()
}

pub mod arima;
pub mod decomposition;
pub mod exponential_smoothing;
pub mod garch;

pub use arima::ArimaModel;
pub use decomposition::{decompose_additive, Decomposition};
pub use exponential_smoothing::HoltWinters;
pub use garch::GarchModel;
