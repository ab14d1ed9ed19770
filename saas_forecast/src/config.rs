//! Analysis configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the standard twelve-month analysis.

use crate::error::{ForecastError, Result};
use crate::sensitivity::{ScenarioGrid, DEFAULT_CHURN_RATES, DEFAULT_MARKETING_MULTIPLIERS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the forecasting and sensitivity stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Months to forecast
    pub horizon: usize,
    /// Season length for Holt-Winters and the decomposition
    pub seasonal_period: usize,
    /// ARIMA order `[p, d, q]`
    pub arima_order: [usize; 3],
    /// GARCH order `[p, q]`
    pub garch_order: [usize; 2],
    /// Coverage of the prediction intervals
    pub confidence_level: f64,
    pub marketing_multipliers: Vec<f64>,
    pub churn_rates: Vec<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            horizon: 12,
            seasonal_period: 12,
            arima_order: [1, 1, 1],
            garch_order: [1, 1],
            confidence_level: 0.95,
            marketing_multipliers: DEFAULT_MARKETING_MULTIPLIERS.to_vec(),
            churn_rates: DEFAULT_CHURN_RATES.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::ConfigError(
                "horizon must be at least 1".to_string(),
            ));
        }
        if self.seasonal_period < 2 {
            return Err(ForecastError::ConfigError(
                "seasonal_period must be at least 2".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::ConfigError(format!(
                "confidence_level must be between 0 and 1, got {}",
                self.confidence_level
            )));
        }

        self.scenario_grid()
            .map(|_| ())
            .map_err(|e| ForecastError::ConfigError(e.to_string()))
    }

    /// The sensitivity grid described by this configuration
    pub fn scenario_grid(&self) -> Result<ScenarioGrid> {
        ScenarioGrid::new(self.marketing_multipliers.clone(), self.churn_rates.clone())
    }
}
