//! Differencing and integration of series
//!
//! ARIMA-style models work on a differenced series and integrate their
//! forecasts back to the original scale. [`integration_anchors`] captures the
//! last value at every differencing level so [`integrate`] can undo any order.

use crate::{MathError, Result};

/// First difference: `y[t] - y[t-1]`
pub fn difference_once(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Difference a series `order` times
pub fn difference(data: &[f64], order: usize) -> Result<Vec<f64>> {
    if data.len() <= order {
        return Err(MathError::InsufficientData(format!(
            "Differencing of order {} needs more than {} observations, have {}",
            order,
            order,
            data.len()
        )));
    }

    let mut result = data.to_vec();
    for _ in 0..order {
        result = difference_once(&result);
    }

    Ok(result)
}

/// Last observed value at each differencing level `0..order`.
///
/// Index 0 holds the last raw value, index 1 the last first difference, etc.
pub fn integration_anchors(data: &[f64], order: usize) -> Result<Vec<f64>> {
    if data.len() <= order {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} observations to integrate order {}",
            order, order
        )));
    }

    let mut anchors = Vec::with_capacity(order);
    let mut current = data.to_vec();
    for _ in 0..order {
        // Non-empty: each level is one shorter and we checked len > order.
        anchors.push(current[current.len() - 1]);
        current = difference_once(&current);
    }

    Ok(anchors)
}

/// Undo differencing on a forecast path using the anchors of the history
pub fn integrate(forecasts: &[f64], anchors: &[f64]) -> Vec<f64> {
    let mut result = forecasts.to_vec();

    for &anchor in anchors.iter().rev() {
        let mut running = anchor;
        for value in result.iter_mut() {
            running += *value;
            *value = running;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_orders() {
        let data = [1.0, 4.0, 9.0, 16.0, 25.0];
        assert_eq!(difference(&data, 0).unwrap(), data.to_vec());
        assert_eq!(difference(&data, 1).unwrap(), vec![3.0, 5.0, 7.0, 9.0]);
        assert_eq!(difference(&data, 2).unwrap(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_difference_too_short() {
        assert!(difference(&[1.0], 1).is_err());
    }

    #[test]
    fn test_integrate_first_order() {
        let data = [10.0, 12.0, 15.0];
        let anchors = integration_anchors(&data, 1).unwrap();
        assert_eq!(anchors, vec![15.0]);
        assert_eq!(integrate(&[1.0, 2.0], &anchors), vec![16.0, 18.0]);
    }

    #[test]
    fn test_integrate_second_order_continues_quadratic() {
        // Squares have a constant second difference of 2.
        let data = [1.0, 4.0, 9.0, 16.0, 25.0];
        let anchors = integration_anchors(&data, 2).unwrap();
        assert_eq!(anchors, vec![25.0, 9.0]);
        assert_eq!(integrate(&[2.0, 2.0], &anchors), vec![36.0, 49.0]);
    }
}
