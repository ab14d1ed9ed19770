//! Descriptive statistics over plain `f64` slices

use crate::{MathError, Result};

/// Arithmetic mean of a non-empty slice
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty series".to_string(),
        ));
    }

    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population variance (divides by `n`)
pub fn variance(data: &[f64]) -> Result<f64> {
    let mean = mean(data)?;
    let sum_sq = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>();

    Ok(sum_sq / data.len() as f64)
}

/// Sum that skips NaN entries. An all-NaN or empty slice sums to zero.
pub fn nan_sum(data: &[f64]) -> f64 {
    data.iter().filter(|x| !x.is_nan()).sum()
}

/// Mean that skips NaN entries. Returns `None` when nothing is left.
pub fn nan_mean(data: &[f64]) -> Option<f64> {
    let (sum, count) = data
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(sum, count), x| (sum + x, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Biased sample autocovariances for lags `0..=max_lag`.
///
/// The series is centered on its mean and every lag is divided by `n`,
/// which keeps the resulting Toeplitz matrix positive semi-definite.
pub fn autocovariance(data: &[f64], max_lag: usize) -> Result<Vec<f64>> {
    let n = data.len();
    if n <= max_lag {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} observations for lag {} autocovariance, have {}",
            max_lag, max_lag, n
        )));
    }

    let mean = mean(data)?;
    let centered: Vec<f64> = data.iter().map(|x| x - mean).collect();

    let autocov = (0..=max_lag)
        .map(|lag| {
            let sum: f64 = centered[lag..]
                .iter()
                .zip(centered.iter())
                .map(|(a, b)| a * b)
                .sum();
            sum / n as f64
        })
        .collect();

    Ok(autocov)
}
