//! Autoregressive estimation helpers
//!
//! Contains:
//! - Levinson-Durbin recursion for the Yule-Walker equations
//! - Psi (MA(infinity)) weights of an ARMA process
//! - Expansion of an AR polynomial by a differencing operator

use crate::statistics::autocovariance;
use crate::{MathError, Result};

/// Solve the Yule-Walker equations from autocovariances `r[0..=order]`.
///
/// Returns the AR coefficients and the innovation variance.
pub fn levinson_durbin(autocov: &[f64], order: usize) -> Result<(Vec<f64>, f64)> {
    if autocov.len() < order + 1 {
        return Err(MathError::InsufficientData(format!(
            "Levinson-Durbin of order {} needs {} autocovariances, have {}",
            order,
            order + 1,
            autocov.len()
        )));
    }

    let mut phi = vec![0.0; order];
    let mut error = autocov[0];

    if error.abs() < 1e-12 {
        // Constant series: nothing to explain.
        return Ok((phi, 0.0));
    }

    for k in 0..order {
        let mut acc = autocov[k + 1];
        for j in 0..k {
            acc -= phi[j] * autocov[k - j];
        }

        let reflection = acc / error;
        if !reflection.is_finite() {
            return Err(MathError::CalculationError(
                "Non-finite reflection coefficient".to_string(),
            ));
        }

        let previous = phi.clone();
        phi[k] = reflection;
        for j in 0..k {
            phi[j] = previous[j] - reflection * previous[k - 1 - j];
        }

        error *= 1.0 - reflection * reflection;
        if error <= 0.0 {
            error = 0.0;
            break;
        }
    }

    Ok((phi, error))
}

/// Fit AR(`order`) coefficients to a series with the Yule-Walker method
pub fn yule_walker(data: &[f64], order: usize) -> Result<(Vec<f64>, f64)> {
    if order == 0 {
        let acov = autocovariance(data, 0)?;
        return Ok((Vec::new(), acov[0]));
    }

    let acov = autocovariance(data, order)?;
    levinson_durbin(&acov, order)
}

/// The first `count` psi weights of `phi(B) y = theta(B) e`.
///
/// `psi[0]` is always 1. The h-step forecast error variance of the process is
/// `sigma^2 * sum(psi[0..h]^2)`.
pub fn psi_weights(ar: &[f64], ma: &[f64], count: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(count);

    for j in 0..count {
        if j == 0 {
            psi.push(1.0);
            continue;
        }

        let mut value = if j <= ma.len() { ma[j - 1] } else { 0.0 };
        for i in 1..=ar.len().min(j) {
            value += ar[i - 1] * psi[j - i];
        }
        psi.push(value);
    }

    psi
}

/// Multiply `1 - sum(phi_i B^i)` by `(1 - B)^d` and return the AR
/// coefficients of the product polynomial.
pub fn integrated_ar_coefficients(ar: &[f64], d: usize) -> Vec<f64> {
    // Polynomial coefficients, constant term first.
    let mut poly: Vec<f64> = std::iter::once(1.0).chain(ar.iter().map(|c| -c)).collect();

    for _ in 0..d {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, &c) in poly.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c;
        }
        poly = next;
    }

    poly.iter().skip(1).map(|c| -c).collect()
}
