//! ARIMA models for time series forecasting

use crate::error::{ForecastError, Result};
use crate::models::{
    check_history, normal_critical_value, symmetric_intervals, ForecastKind, ForecastModel,
    ForecastResult, TrainedForecastModel,
};
use saas_math::autoregression::{integrated_ar_coefficients, psi_weights, yule_walker};
use saas_math::differencing::{difference, integrate, integration_anchors};
use saas_math::statistics::mean;
use std::collections::BTreeMap;

/// MA coefficients are clamped to this magnitude to keep the process invertible
const MA_COEFFICIENT_BOUND: f64 = 0.99;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    /// Coverage of the prediction intervals
    confidence_level: f64,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    p: usize,
    d: usize,
    q: usize,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Mean of the differenced series
    constant: f64,
    /// Differenced history
    differenced: Vec<f64>,
    /// One-step residuals on the differenced scale
    residuals: Vec<f64>,
    /// Last value at each differencing level
    anchors: Vec<f64>,
    /// Residual variance
    sigma2: f64,
    /// Normal critical value for the intervals
    critical_value: f64,
}

impl ArimaModel {
    /// Create a new ARIMA model with 95% prediction intervals
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p > 10 || d > 2 || q > 10 {
            return Err(ForecastError::InvalidParameter(format!(
                "Unsupported ARIMA order ({},{},{}): p and q must be at most 10, d at most 2",
                p, d, q
            )));
        }

        Ok(Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            p,
            d,
            q,
            confidence_level: 0.95,
        })
    }

    /// Set the coverage of the prediction intervals
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Result<Self> {
        normal_critical_value(confidence_level)?;
        self.confidence_level = confidence_level;
        Ok(self)
    }

    /// Moment estimate of MA coefficients from the residual autocorrelation
    fn estimate_ma_coefficients(&self, residuals: &[f64]) -> Vec<f64> {
        let n = residuals.len();
        let mut coefficients = vec![0.0; self.q];
        if self.q == 0 || n == 0 {
            return coefficients;
        }

        let center = residuals.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = residuals.iter().map(|x| x - center).collect();
        let variance = centered.iter().map(|x| x * x).sum::<f64>() / n as f64;

        if variance.abs() <= 1e-10 {
            return coefficients;
        }

        for (k, coefficient) in coefficients.iter_mut().enumerate() {
            let lag = k + 1;
            let sum: f64 = (lag..n).map(|i| centered[i] * centered[i - lag]).sum();
            *coefficient =
                ((sum / n as f64) / variance).clamp(-MA_COEFFICIENT_BOUND, MA_COEFFICIENT_BOUND);
        }

        coefficients
    }
}

impl ForecastModel for ArimaModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 10
    }

    fn train(&self, history: &[f64]) -> Result<Box<dyn TrainedForecastModel>> {
        check_history(&self.name, self.min_observations(), history)?;

        let differenced = difference(history, self.d)?;
        let anchors = integration_anchors(history, self.d)?;
        let constant = mean(&differenced)?;

        let (ar_coefficients, _) = yule_walker(&differenced, self.p)?;

        let mut residuals = vec![0.0; differenced.len()];
        for i in self.p..differenced.len() {
            let mut prediction = constant;
            for (j, phi) in ar_coefficients.iter().enumerate() {
                prediction += phi * (differenced[i - j - 1] - constant);
            }
            residuals[i] = differenced[i] - prediction;
        }

        let ma_coefficients = self.estimate_ma_coefficients(&residuals[self.p..]);

        // Residual variance after accounting for the MA terms.
        let mut innovations = vec![0.0; residuals.len()];
        for i in self.p..residuals.len() {
            let mut value = residuals[i];
            for (j, theta) in ma_coefficients.iter().enumerate() {
                if i >= self.p + j + 1 {
                    value -= theta * innovations[i - j - 1];
                }
            }
            innovations[i] = value;
        }
        let fitted = &innovations[self.p..];
        let sigma2 = fitted.iter().map(|e| e * e).sum::<f64>() / fitted.len().max(1) as f64;

        tracing::debug!(
            model = %self.name,
            ar = ?ar_coefficients,
            ma = ?ma_coefficients,
            sigma2,
            "fitted ARIMA"
        );

        Ok(Box::new(TrainedArimaModel {
            name: self.name.clone(),
            p: self.p,
            d: self.d,
            q: self.q,
            ar_coefficients,
            ma_coefficients,
            constant,
            differenced,
            residuals,
            anchors,
            sigma2,
            critical_value: normal_critical_value(self.confidence_level)?,
        }))
    }
}

impl TrainedArimaModel {
    /// Recursive forecasts on the differenced scale; future shocks are zero
    fn forecast_differenced(&self, horizon: usize) -> Vec<f64> {
        let n = self.differenced.len();
        let mut extended = self.differenced.clone();
        let mut shocks = self.residuals.clone();

        for _ in 0..horizon {
            let mut forecast = self.constant;

            for (j, phi) in self.ar_coefficients.iter().enumerate() {
                forecast += phi * (extended[extended.len() - j - 1] - self.constant);
            }
            for (j, theta) in self.ma_coefficients.iter().enumerate() {
                if shocks.len() > j {
                    forecast += theta * shocks[shocks.len() - j - 1];
                }
            }

            extended.push(forecast);
            shocks.push(0.0);
        }

        extended.split_off(n)
    }

    /// h-step forecast error variances from the psi weights of the
    /// integrated process
    fn forecast_variances(&self, horizon: usize) -> Vec<f64> {
        let ar = integrated_ar_coefficients(&self.ar_coefficients, self.d);
        let psi = psi_weights(&ar, &self.ma_coefficients, horizon);

        let mut cumulative = 0.0;
        psi.iter()
            .map(|w| {
                cumulative += w * w;
                self.sigma2 * cumulative
            })
            .collect()
    }

    /// Fitted AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    /// Fitted MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let values = integrate(&self.forecast_differenced(horizon), &self.anchors);
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
        parameters.insert("p".to_string(), self.p as f64);
        parameters.insert("d".to_string(), self.d as f64);
        parameters.insert("q".to_string(), self.q as f64);
        parameters.insert("constant".to_string(), self.constant);
        parameters.insert("sigma2".to_string(), self.sigma2);
        for (i, phi) in self.ar_coefficients.iter().enumerate() {
            parameters.insert(format!("ar.L{}", i + 1), *phi);
        }
        for (i, theta) in self.ma_coefficients.iter().enumerate() {
            parameters.insert(format!("ma.L{}", i + 1), *theta);
        }
        parameters
    }
}
