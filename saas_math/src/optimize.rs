//! Deterministic grid-search minimisation
//!
//! The smoothing and volatility models pick their parameters by evaluating an
//! objective over a fixed lattice. Exhaustive search keeps fitting
//! reproducible and free of convergence tolerances.

use crate::{MathError, Result};

/// Best point found by [`minimize_over_grid`]
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptimum {
    /// Coordinates of the best point, one per axis
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Number of feasible points evaluated
    pub evaluated: usize,
}

/// Evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, steps: usize) -> Result<Vec<f64>> {
    if steps < 2 {
        return Err(MathError::InvalidInput(
            "A grid axis needs at least two steps".to_string(),
        ));
    }
    if !(start.is_finite() && end.is_finite()) || end < start {
        return Err(MathError::InvalidInput(format!(
            "Invalid grid bounds [{}, {}]",
            start, end
        )));
    }

    let step = (end - start) / (steps - 1) as f64;
    Ok((0..steps).map(|i| start + step * i as f64).collect())
}

/// Evaluate `objective` on every point of the Cartesian product of `axes`.
///
/// The objective returns `None` for infeasible points. Ties keep the first
/// point in iteration order (last axis varies fastest).
pub fn minimize_over_grid<F>(axes: &[Vec<f64>], mut objective: F) -> Result<GridOptimum>
where
    F: FnMut(&[f64]) -> Option<f64>,
{
    if axes.is_empty() || axes.iter().any(|a| a.is_empty()) {
        return Err(MathError::InvalidInput(
            "Grid search needs at least one non-empty axis".to_string(),
        ));
    }

    let mut indices = vec![0usize; axes.len()];
    let mut point: Vec<f64> = axes.iter().map(|a| a[0]).collect();
    let mut best: Option<(Vec<f64>, f64)> = None;
    let mut evaluated = 0;

    loop {
        if let Some(value) = objective(&point) {
            if value.is_finite() {
                evaluated += 1;
                let improves = best.as_ref().map_or(true, |(_, b)| value < *b);
                if improves {
                    best = Some((point.clone(), value));
                }
            }
        }

        // Odometer increment, last axis fastest.
        let mut axis = axes.len();
        loop {
            if axis == 0 {
                return best
                    .map(|(point, value)| GridOptimum {
                        point,
                        value,
                        evaluated,
                    })
                    .ok_or_else(|| {
                        MathError::CalculationError(
                            "No feasible point on the search grid".to_string(),
                        )
                    });
            }
            axis -= 1;
            indices[axis] += 1;
            if indices[axis] < axes[axis].len() {
                point[axis] = axes[axis][indices[axis]];
                break;
            }
            indices[axis] = 0;
            point[axis] = axes[axis][0];
        }
    }
}
