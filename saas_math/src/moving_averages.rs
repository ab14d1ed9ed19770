//! Moving average calculation implementations
//!
//! Centered moving averages used for trend extraction, including the 2xm
//! form for even windows.

use crate::{MathError, Result};

/// Centered moving average over `window` points.
///
/// Odd windows average `window` symmetric neighbours. Even windows use the
/// 2xm filter: `window + 1` points with half weight on both ends. Positions
/// without a full neighbourhood are `None`.
pub fn centered_moving_average(data: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    if window < 2 {
        return Err(MathError::InvalidInput(
            "Centered window must be at least 2".to_string(),
        ));
    }

    let half = window / 2;
    let n = data.len();
    if n < 2 * half + 1 {
        return Err(MathError::InsufficientData(format!(
            "Centered moving average of window {} needs at least {} observations, have {}",
            window,
            2 * half + 1,
            n
        )));
    }

    let weights: Vec<f64> = if window % 2 == 1 {
        vec![1.0 / window as f64; window]
    } else {
        let mut w = vec![1.0 / window as f64; window + 1];
        w[0] /= 2.0;
        w[window] /= 2.0;
        w
    };

    let mut result = vec![None; n];
    for (i, slot) in result.iter_mut().enumerate().take(n - half).skip(half) {
        let value = data[i - half..=i + half]
            .iter()
            .zip(weights.iter())
            .map(|(x, w)| x * w)
            .sum();
        *slot = Some(value);
    }

    Ok(result)
}
