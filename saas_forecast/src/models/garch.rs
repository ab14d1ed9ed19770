//! GARCH models for volatility forecasting
//!
//! A constant-mean GARCH(p, q) on the level series:
//!
//! ```text
//! e[t]      = y[t] - mu
//! sigma2[t] = omega + sum(alpha[i] * e[t-i]^2) + sum(beta[j] * sigma2[t-j])
//! ```
//!
//! The intercept is pinned by variance targeting, `omega = s2 * (1 - sum(alpha)
//! - sum(beta))`, and the persistence split is chosen by maximising the
//! Gaussian log-likelihood over a fixed grid. Forecasts are conditional
//! variances, not levels.

use crate::error::{ForecastError, Result};
use crate::models::{
    check_history, ForecastKind, ForecastModel, ForecastResult, TrainedForecastModel,
};
use saas_math::optimize::{linspace, minimize_over_grid};
use saas_math::statistics::{mean, variance};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Largest admissible persistence `sum(alpha) + sum(beta)`
const MAX_PERSISTENCE: f64 = 0.999;

/// GARCH model implementation
#[derive(Debug, Clone)]
pub struct GarchModel {
    /// Model name
    name: String,
    /// GARCH order (p)
    p: usize,
    /// ARCH order (q)
    q: usize,
}

/// Trained GARCH model
#[derive(Debug, Clone)]
pub struct TrainedGarchModel {
    name: String,
    /// Constant mean
    mu: f64,
    /// Intercept
    omega: f64,
    /// ARCH parameters
    alpha: Vec<f64>,
    /// GARCH parameters
    beta: Vec<f64>,
    /// Squared residuals of the history
    squared_residuals: Vec<f64>,
    /// Conditional variances of the history
    conditional_variances: Vec<f64>,
    /// Log-likelihood at the fitted parameters
    log_likelihood: f64,
}

impl GarchModel {
    /// Create a new GARCH model
    pub fn new(p: usize, q: usize) -> Result<Self> {
        if q == 0 {
            return Err(ForecastError::InvalidParameter(
                "GARCH needs at least one ARCH term (q >= 1)".to_string(),
            ));
        }
        if p > 5 || q > 5 {
            return Err(ForecastError::InvalidParameter(format!(
                "Unsupported GARCH order ({},{}): orders must be at most 5",
                p, q
            )));
        }

        Ok(Self {
            name: format!("GARCH({},{})", p, q),
            p,
            q,
        })
    }
}

/// Run the variance recursion and return the conditional variances
fn filter_variances(
    squared_residuals: &[f64],
    sample_variance: f64,
    omega: f64,
    alpha: &[f64],
    beta: &[f64],
) -> Vec<f64> {
    let warmup = alpha.len().max(beta.len());
    let mut variances = vec![sample_variance; squared_residuals.len()];

    for t in warmup..squared_residuals.len() {
        let mut value = omega;
        for (i, a) in alpha.iter().enumerate() {
            value += a * squared_residuals[t - i - 1];
        }
        for (j, b) in beta.iter().enumerate() {
            value += b * variances[t - j - 1];
        }
        variances[t] = value;
    }

    variances
}

/// Gaussian log-likelihood of the residuals given their variances
fn log_likelihood(squared_residuals: &[f64], variances: &[f64]) -> Option<f64> {
    let mut total = 0.0;
    for (e2, s2) in squared_residuals.iter().zip(variances.iter()) {
        if *s2 <= 0.0 || !s2.is_finite() {
            return None;
        }
        total += (2.0 * PI).ln() + s2.ln() + e2 / s2;
    }
    Some(-0.5 * total)
}

/// Spread a total evenly across `lags` coefficients
fn split_evenly(total: f64, lags: usize) -> Vec<f64> {
    if lags == 0 {
        return Vec::new();
    }
    vec![total / lags as f64; lags]
}

impl ForecastModel for GarchModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_observations(&self) -> usize {
        self.p + self.q + 10
    }

    fn train(&self, history: &[f64]) -> Result<Box<dyn TrainedForecastModel>> {
        check_history(&self.name, self.min_observations(), history)?;

        let mu = mean(history)?;
        let squared_residuals: Vec<f64> = history.iter().map(|y| (y - mu).powi(2)).collect();
        let sample_variance = variance(history)?;

        if sample_variance <= f64::EPSILON {
            return Err(ForecastError::InvalidData(format!(
                "{}: series has no variation to model",
                self.name
            )));
        }

        let alpha_axis = linspace(0.0, 0.5, 26)?;
        let beta_axis = if self.p == 0 {
            vec![0.0]
        } else {
            linspace(0.0, 0.96, 49)?
        };

        let optimum = minimize_over_grid(&[alpha_axis, beta_axis], |point| {
            let persistence = point[0] + point[1];
            if persistence >= MAX_PERSISTENCE {
                return None;
            }

            let omega = sample_variance * (1.0 - persistence);
            let alpha = split_evenly(point[0], self.q);
            let beta = split_evenly(point[1], self.p);
            let variances =
                filter_variances(&squared_residuals, sample_variance, omega, &alpha, &beta);

            log_likelihood(&squared_residuals, &variances).map(|ll| -ll)
        })?;

        let alpha = split_evenly(optimum.point[0], self.q);
        let beta = split_evenly(optimum.point[1], self.p);
        let omega = sample_variance * (1.0 - optimum.point[0] - optimum.point[1]);
        let conditional_variances =
            filter_variances(&squared_residuals, sample_variance, omega, &alpha, &beta);

        tracing::debug!(
            model = %self.name,
            omega,
            alpha = ?alpha,
            beta = ?beta,
            evaluated = optimum.evaluated,
            "fitted GARCH"
        );

        Ok(Box::new(TrainedGarchModel {
            name: self.name.clone(),
            mu,
            omega,
            alpha,
            beta,
            squared_residuals,
            conditional_variances,
            log_likelihood: -optimum.value,
        }))
    }
}

impl TrainedGarchModel {
    /// Forecast conditional variances; future squared shocks are replaced by
    /// their expectation
    fn forecast_variances(&self, horizon: usize) -> Vec<f64> {
        let n = self.squared_residuals.len();
        let mut shocks = self.squared_residuals.clone();
        let mut variances = self.conditional_variances.clone();

        for _ in 0..horizon {
            let mut value = self.omega;
            for (i, a) in self.alpha.iter().enumerate() {
                value += a * shocks[shocks.len() - i - 1];
            }
            for (j, b) in self.beta.iter().enumerate() {
                value += b * variances[variances.len() - j - 1];
            }
            variances.push(value);
            shocks.push(value);
        }

        variances.split_off(n)
    }

    /// Persistence `sum(alpha) + sum(beta)`
    fn persistence(&self) -> f64 {
        self.alpha.iter().sum::<f64>() + self.beta.iter().sum::<f64>()
    }
}

impl TrainedForecastModel for TrainedGarchModel {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let values = self.forecast_variances(horizon);
        Ok(
            ForecastResult::new(&self.name, ForecastKind::Variance, values, horizon)?
                .with_parameters(self.parameters()),
        )
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> BTreeMap<String, f64> {
        let mut parameters = BTreeMap::new();
        parameters.insert("mu".to_string(), self.mu);
        parameters.insert("omega".to_string(), self.omega);
        parameters.insert("log_likelihood".to_string(), self.log_likelihood);
        parameters.insert("persistence".to_string(), self.persistence());
        for (i, a) in self.alpha.iter().enumerate() {
            parameters.insert(format!("alpha[{}]", i + 1), *a);
        }
        for (j, b) in self.beta.iter().enumerate() {
            parameters.insert(format!("beta[{}]", j + 1), *b);
        }
        parameters
    }
}
