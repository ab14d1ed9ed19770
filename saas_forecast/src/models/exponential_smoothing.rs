//! Exponential smoothing models for time series forecasting

use crate::error::{ForecastError, Result};
use crate::models::{
    check_history, normal_critical_value, symmetric_intervals, ForecastKind, ForecastModel,
    ForecastResult, TrainedForecastModel,
};
use saas_math::optimize::{linspace, minimize_over_grid};
use std::collections::BTreeMap;

/// Holt-Winters model with additive trend and additive seasonality
#[derive(Debug, Clone)]
pub struct HoltWinters {
    /// Name of the model
    name: String,
    /// Season length in observations
    period: usize,
    /// Coverage of the prediction intervals
    confidence_level: f64,
}

/// Trained Holt-Winters model
#[derive(Debug, Clone)]
pub struct TrainedHoltWinters {
    name: String,
    period: usize,
    /// Level smoothing parameter
    alpha: f64,
    /// Trend smoothing parameter
    beta: f64,
    /// Seasonal smoothing parameter
    gamma: f64,
    /// Final level
    level: f64,
    /// Final trend
    trend: f64,
    /// Seasonal components indexed by position modulo the period
    seasonal: Vec<f64>,
    /// Number of observations the model was trained on
    observations: usize,
    /// Mean squared one-step error
    sigma2: f64,
    /// Normal critical value for the intervals
    critical_value: f64,
}

/// Final state of a smoothing pass
struct SmoothingState {
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    sse: f64,
    errors: usize,
}

impl HoltWinters {
    /// Create a new additive Holt-Winters model
    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal period must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Holt-Winters(additive, {})", period),
            period,
            confidence_level: 0.95,
        })
    }

    /// Set the coverage of the prediction intervals
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Result<Self> {
        normal_critical_value(confidence_level)?;
        self.confidence_level = confidence_level;
        Ok(self)
    }

    /// Season length
    pub fn period(&self) -> usize {
        self.period
    }

    /// Run the smoothing equations over `data`, accumulating one-step errors.
    ///
    /// The initial state comes from the first two seasons: the trend is the
    /// slope between their means, and each seasonal term is the average
    /// deviation from that line at its cycle position, centered to sum to zero.
    fn smooth(&self, data: &[f64], alpha: f64, beta: f64, gamma: f64) -> SmoothingState {
        let m = self.period;
        let first: f64 = data[..m].iter().sum::<f64>() / m as f64;
        let second: f64 = data[m..2 * m].iter().sum::<f64>() / m as f64;
        let mut trend = (second - first) / m as f64;
        let center = (m as f64 - 1.0) / 2.0;

        let mut seasonal: Vec<f64> = (0..m)
            .map(|i| {
                let offset = trend * (i as f64 - center);
                ((data[i] - first - offset) + (data[i + m] - second - offset)) / 2.0
            })
            .collect();
        let shift = seasonal.iter().sum::<f64>() / m as f64;
        for value in seasonal.iter_mut() {
            *value -= shift;
        }

        let mut level = first + trend * center;
        let mut sse = 0.0;
        let mut errors = 0;

        for (i, &value) in data.iter().enumerate().skip(m) {
            let index = i % m;
            let previous_level = level;
            let previous_seasonal = seasonal[index];

            let error = value - (level + trend + previous_seasonal);
            sse += error * error;
            errors += 1;

            level = alpha * (value - previous_seasonal) + (1.0 - alpha) * (level + trend);
            trend = beta * (level - previous_level) + (1.0 - beta) * trend;
            seasonal[index] = gamma * (value - level) + (1.0 - gamma) * previous_seasonal;
        }

        SmoothingState {
            level,
            trend,
            seasonal,
            sse,
            errors,
        }
    }
}

impl ForecastModel for HoltWinters {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_observations(&self) -> usize {
        2 * self.period
    }

    fn train(&self, history: &[f64]) -> Result<Box<dyn TrainedForecastModel>> {
        check_history(&self.name, self.min_observations(), history)?;

        let axis = linspace(0.05, 0.95, 19)?;
        let optimum = minimize_over_grid(&[axis.clone(), axis.clone(), axis], |point| {
            Some(self.smooth(history, point[0], point[1], point[2]).sse)
        })?;

        let (alpha, beta, gamma) = (optimum.point[0], optimum.point[1], optimum.point[2]);
        let state = self.smooth(history, alpha, beta, gamma);
        let sigma2 = state.sse / state.errors.max(1) as f64;

        tracing::debug!(
            model = %self.name,
            alpha,
            beta,
            gamma,
            sse = state.sse,
            "fitted Holt-Winters"
        );

        Ok(Box::new(TrainedHoltWinters {
            name: self.name.clone(),
            period: self.period,
            alpha,
            beta,
            gamma,
            level: state.level,
            trend: state.trend,
            seasonal: state.seasonal,
            observations: history.len(),
            sigma2,
            critical_value: normal_critical_value(self.confidence_level)?,
        }))
    }
}

impl TrainedHoltWinters {
    /// Forecast error variance at steps `1..=horizon`.
    ///
    /// Uses the closed form for the additive error, additive trend and
    /// additive season state space model: `v_h = sigma2 * (1 + sum c_j^2)`
    /// with `c_j = alpha * (1 + j * beta) + gamma * (1 - alpha) * [j % m == 0]`.
    fn forecast_variances(&self, horizon: usize) -> Vec<f64> {
        let mut cumulative = 0.0;
        (1..=horizon)
            .map(|h| {
                if h > 1 {
                    let j = h - 1;
                    let seasonal = if j % self.period == 0 {
                        self.gamma * (1.0 - self.alpha)
                    } else {
                        0.0
                    };
                    let c = self.alpha * (1.0 + j as f64 * self.beta) + seasonal;
                    cumulative += c * c;
                }
                self.sigma2 * (1.0 + cumulative)
            })
            .collect()
    }
}

impl TrainedForecastModel for TrainedHoltWinters {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let values: Vec<f64> = (1..=horizon)
            .map(|h| {
                let index = (self.observations + h - 1) % self.period;
                self.level + h as f64 * self.trend + self.seasonal[index]
            })
            .collect();

        let intervals = symmetric_intervals(
            &values,
            &self.forecast_variances(horizon),
            self.critical_value,
        );

        ForecastResult::new(&self.name, ForecastKind::Level, values, horizon)?
            .with_intervals(intervals)
            .map(|result| result.with_parameters(self.parameters()))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> BTreeMap<String, f64> {
        let mut parameters = BTreeMap::new();
        parameters.insert("period".to_string(), self.period as f64);
        parameters.insert("alpha".to_string(), self.alpha);
        parameters.insert("beta".to_string(), self.beta);
        parameters.insert("gamma".to_string(), self.gamma);
        parameters.insert("level".to_string(), self.level);
        parameters.insert("trend".to_string(), self.trend);
        parameters.insert("sigma2".to_string(), self.sigma2);
        parameters
    }
}
