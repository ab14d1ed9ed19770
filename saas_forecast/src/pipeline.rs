//! Forecast pipeline
//!
//! Runs every configured model on the same history. Each model is trained
//! and forecast in isolation: a failure is logged and recorded in the report
//! but never stops the remaining models or the decomposition.

use crate::columns;
use crate::config::AnalysisConfig;
use crate::data::MetricTable;
use crate::error::{ForecastError, Result};
use crate::models::{
    decompose_additive, ArimaModel, Decomposition, ForecastModel, ForecastResult, GarchModel,
    HoltWinters,
};
use crate::utils::months_after;
use chrono::NaiveDate;
use tracing::{info, warn};

/// Name prefix of the model whose level forecast drives the projections
pub const REVENUE_MODEL: &str = "ARIMA";

/// Outcome of one model
#[derive(Debug)]
pub struct ModelOutcome {
    pub model: String,
    pub result: Result<ForecastResult>,
}

/// Everything one pipeline run produced
#[derive(Debug)]
pub struct PipelineReport {
    /// Months the forecasts are aligned to
    pub months: Vec<NaiveDate>,
    /// Per-model outcomes, in model order
    pub outcomes: Vec<ModelOutcome>,
    /// Seasonal decomposition of the history
    pub decomposition: Result<Decomposition>,
}

impl PipelineReport {
    /// First outcome whose model name starts with `prefix`
    pub fn outcome(&self, prefix: &str) -> Option<&ModelOutcome> {
        self.outcomes.iter().find(|o| o.model.starts_with(prefix))
    }

    /// Successful forecast of the model whose name starts with `prefix`
    pub fn forecast(&self, prefix: &str) -> Option<&ForecastResult> {
        self.outcome(prefix).and_then(|o| o.result.as_ref().ok())
    }

    /// Level forecast used for the profit and cash-flow projections
    pub fn revenue_forecast(&self) -> Option<&ForecastResult> {
        self.forecast(REVENUE_MODEL)
    }

    /// Successful forecasts in model order
    pub fn successes(&self) -> impl Iterator<Item = &ForecastResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Failed models with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ForecastError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.model.as_str(), e)))
    }
}

/// Ordered list of forecasting models sharing a horizon
#[derive(Debug)]
pub struct ForecastPipeline {
    models: Vec<Box<dyn ForecastModel>>,
    horizon: usize,
    seasonal_period: usize,
}

impl ForecastPipeline {
    /// Create an empty pipeline
    pub fn new(horizon: usize, seasonal_period: usize) -> Result<Self> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }
        if seasonal_period < 2 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal period must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            models: Vec::new(),
            horizon,
            seasonal_period,
        })
    }

    /// ARIMA, GARCH and Holt-Winters as configured
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let [p, d, q] = config.arima_order;
        let [garch_p, garch_q] = config.garch_order;

        Ok(Self::new(config.horizon, config.seasonal_period)?
            .with_model(ArimaModel::new(p, d, q)?.with_confidence_level(config.confidence_level)?)
            .with_model(GarchModel::new(garch_p, garch_q)?)
            .with_model(
                HoltWinters::new(config.seasonal_period)?
                    .with_confidence_level(config.confidence_level)?,
            ))
    }

    /// Append a model
    pub fn with_model<M: ForecastModel + 'static>(mut self, model: M) -> Self {
        self.models.push(Box::new(model));
        self
    }

    /// Names of the models, in run order
    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name()).collect()
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Forecast `Total_MRR` of a derived table
    pub fn run_table(&self, table: &MetricTable) -> Result<PipelineReport> {
        let history = table.column_f64(columns::TOTAL_MRR)?;
        self.run(table.months(), &history)
    }

    /// Run every model on `history`, observed at `months`
    pub fn run(&self, months: &[NaiveDate], history: &[f64]) -> Result<PipelineReport> {
        if months.len() != history.len() {
            return Err(ForecastError::InvalidData(format!(
                "{} months for {} observations",
                months.len(),
                history.len()
            )));
        }
        let last_month = months
            .last()
            .copied()
            .ok_or_else(|| ForecastError::InvalidData("Empty history".to_string()))?;
        let future = months_after(last_month, self.horizon)?;

        info!(
            models = self.models.len(),
            observations = history.len(),
            horizon = self.horizon,
            "running forecast pipeline"
        );

        let outcomes = self
            .models
            .iter()
            .map(|model| {
                let result = model
                    .train(history)
                    .and_then(|trained| trained.forecast(self.horizon))
                    .and_then(|forecast| forecast.aligned_to(future.clone()));

                match &result {
                    Ok(_) => info!(model = model.name(), "forecast complete"),
                    Err(e) => warn!(model = model.name(), error = %e, "forecast failed"),
                }

                ModelOutcome {
                    model: model.name().to_string(),
                    result,
                }
            })
            .collect();

        let decomposition = decompose_additive(history, self.seasonal_period);
        if let Err(e) = &decomposition {
            warn!(error = %e, "seasonal decomposition failed");
        }

        Ok(PipelineReport {
            months: future,
            outcomes,
            decomposition,
        })
    }
}
