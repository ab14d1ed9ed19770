//! Classical additive seasonal decomposition

use crate::error::{ForecastError, Result};
use crate::models::check_history;
use saas_math::moving_averages::centered_moving_average;
use serde::Serialize;

/// Name used in errors and logs
pub const DECOMPOSITION_NAME: &str = "Seasonal decomposition";

/// Decomposed time series components, aligned with the observations.
///
/// `trend` and `residual` are `None` for the first and last half-window,
/// where the centered moving average is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    pub period: usize,
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

impl Decomposition {
    /// One seasonal value per position in the cycle, summing to zero
    pub fn seasonal_figure(&self) -> &[f64] {
        &self.seasonal[..self.period.min(self.seasonal.len())]
    }
}

/// Split `data` into trend, seasonal and residual components.
///
/// Trend is the centered moving average of length `period` (2×m for even
/// periods). The seasonal figure is the mean detrended value at each cycle
/// position, shifted so the figure sums to zero.
pub fn decompose_additive(data: &[f64], period: usize) -> Result<Decomposition> {
    if period < 2 {
        return Err(ForecastError::InvalidParameter(
            "Seasonal period must be at least 2".to_string(),
        ));
    }
    check_history(DECOMPOSITION_NAME, 2 * period, data)?;

    let trend = centered_moving_average(data, period)?;

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, (value, t)) in data.iter().zip(trend.iter()).enumerate() {
        if let Some(t) = t {
            sums[i % period] += value - t;
            counts[i % period] += 1;
        }
    }

    let mut figure = Vec::with_capacity(period);
    for (position, (sum, count)) in sums.iter().zip(counts.iter()).enumerate() {
        if *count == 0 {
            return Err(ForecastError::InvalidData(format!(
                "{}: no detrended values at cycle position {}",
                DECOMPOSITION_NAME, position
            )));
        }
        figure.push(sum / *count as f64);
    }

    let offset = figure.iter().sum::<f64>() / period as f64;
    for value in figure.iter_mut() {
        *value -= offset;
    }

    let seasonal: Vec<f64> = (0..data.len()).map(|i| figure[i % period]).collect();
    let residual = data
        .iter()
        .zip(trend.iter())
        .zip(seasonal.iter())
        .map(|((value, t), s)| t.map(|t| value - t - s))
        .collect();

    Ok(Decomposition {
        period,
        observed: data.to_vec(),
        trend,
        seasonal,
        residual,
    })
}
