//! Scenario sensitivity sweep over marketing spend and churn assumptions
//!
//! Every scenario starts from the last observed MRR and decays it by a fixed
//! churn rate each month. No new-subscriber growth is modelled, and costs
//! stay at their last observed values apart from the marketing multiplier.

use crate::error::{ForecastError, Result};
use crate::projection::LastObserved;
use crate::utils::month_label;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Profit level drawn as the break-even reference line
pub const BREAK_EVEN_PROFIT: f64 = 0.0;

/// Default marketing spend multipliers
pub const DEFAULT_MARKETING_MULTIPLIERS: [f64; 3] = [0.9, 1.0, 1.1];

/// Default monthly churn rates
pub const DEFAULT_CHURN_RATES: [f64; 3] = [0.02, 0.03, 0.05];

/// One point of the assumption grid
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScenarioKey {
    marketing_multiplier: f64,
    churn_rate: f64,
}

impl ScenarioKey {
    pub fn new(marketing_multiplier: f64, churn_rate: f64) -> Self {
        // Adding 0.0 turns -0.0 into 0.0 so equal values hash equally.
        Self {
            marketing_multiplier: marketing_multiplier + 0.0,
            churn_rate: churn_rate + 0.0,
        }
    }

    pub fn marketing_multiplier(&self) -> f64 {
        self.marketing_multiplier
    }

    pub fn churn_rate(&self) -> f64 {
        self.churn_rate
    }

    /// `Marketing_<pct>_Churn_<pct>`, e.g. `Marketing_110_Churn_3`
    pub fn label(&self) -> String {
        format!(
            "Marketing_{}_Churn_{}",
            percent(self.marketing_multiplier),
            percent(self.churn_rate)
        )
    }

    fn bits(&self) -> (u64, u64) {
        (self.marketing_multiplier.to_bits(), self.churn_rate.to_bits())
    }
}

impl PartialEq for ScenarioKey {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for ScenarioKey {}

impl Hash for ScenarioKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl std::fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Validated assumption grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioGrid {
    marketing_multipliers: Vec<f64>,
    churn_rates: Vec<f64>,
}

impl Default for ScenarioGrid {
    fn default() -> Self {
        Self {
            marketing_multipliers: DEFAULT_MARKETING_MULTIPLIERS.to_vec(),
            churn_rates: DEFAULT_CHURN_RATES.to_vec(),
        }
    }
}

fn percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

fn check_axis(name: &str, values: &[f64], valid: impl Fn(f64) -> bool) -> Result<()> {
    if values.is_empty() {
        return Err(ForecastError::InvalidParameter(format!(
            "Scenario grid needs at least one {}",
            name
        )));
    }

    for (i, &value) in values.iter().enumerate() {
        if !value.is_finite() || !valid(value) {
            return Err(ForecastError::InvalidParameter(format!(
                "Invalid {} {}",
                name, value
            )));
        }
        if values[..i].iter().any(|&v| v + 0.0 == value + 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Duplicate {} {}",
                name, value
            )));
        }
        // Labels carry whole percents, so distinct values must not round together.
        if let Some(&other) = values[..i].iter().find(|&&v| percent(v) == percent(value)) {
            return Err(ForecastError::InvalidParameter(format!(
                "{} {} and {} share the label percent {}",
                name,
                other,
                value,
                percent(value)
            )));
        }
    }

    Ok(())
}

impl ScenarioGrid {
    /// Build a grid, rejecting empty, non-finite, out-of-range or duplicate values,
/// and values whose labels would collide
    pub fn new(marketing_multipliers: Vec<f64>, churn_rates: Vec<f64>) -> Result<Self> {
        check_axis("marketing multiplier", &marketing_multipliers, |m| m >= 0.0)?;
        check_axis("churn rate", &churn_rates, |c| (0.0..=1.0).contains(&c))?;

        Ok(Self {
            marketing_multipliers,
            churn_rates,
        })
    }

    pub fn marketing_multipliers(&self) -> &[f64] {
        &self.marketing_multipliers
    }

    pub fn churn_rates(&self) -> &[f64] {
        &self.churn_rates
    }

    /// Cartesian product of the axes, multipliers outer and churn rates inner
    pub fn keys(&self) -> impl Iterator<Item = ScenarioKey> + '_ {
        self.marketing_multipliers.iter().flat_map(move |&m| {
            self.churn_rates
                .iter()
                .map(move |&c| ScenarioKey::new(m, c))
        })
    }

    /// Number of scenarios
    pub fn len(&self) -> usize {
        self.marketing_multipliers.len() * self.churn_rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Monthly profit trajectory of a single scenario
pub fn simulate_scenario(key: ScenarioKey, baseline: &LastObserved, horizon: usize) -> Vec<f64> {
    let marketing = baseline.marketing_spend * key.marketing_multiplier();
    let mut mrr = baseline.total_mrr;

    (0..horizon)
        .map(|_| {
            mrr *= 1.0 - key.churn_rate();
            mrr - marketing - baseline.fixed_costs - baseline.variable_costs
        })
        .collect()
}

/// Sweep over every scenario of a grid
#[derive(Debug, Clone)]
pub struct SensitivitySweep {
    grid: ScenarioGrid,
    horizon: usize,
}

impl SensitivitySweep {
    pub fn new(grid: ScenarioGrid, horizon: usize) -> Result<Self> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Sweep horizon must be positive".to_string(),
            ));
        }
        Ok(Self { grid, horizon })
    }

    pub fn grid(&self) -> &ScenarioGrid {
        &self.grid
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Simulate every scenario from the same baseline
    pub fn run(&self, baseline: &LastObserved) -> SensitivityResults {
        let mut results = SensitivityResults::with_capacity(self.horizon, self.grid.len());
        for key in self.grid.keys() {
            results.insert(key, simulate_scenario(key, baseline, self.horizon));
        }

        tracing::info!(
            scenarios = results.len(),
            horizon = self.horizon,
            "sensitivity sweep complete"
        );

        results
    }
}

/// Scenario trajectories in grid order, with lookup by key
#[derive(Debug, Clone, Default)]
pub struct SensitivityResults {
    horizon: usize,
    scenarios: Vec<(ScenarioKey, Vec<f64>)>,
    index: HashMap<ScenarioKey, usize>,
}

impl SensitivityResults {
    fn with_capacity(horizon: usize, capacity: usize) -> Self {
        Self {
            horizon,
            scenarios: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    fn insert(&mut self, key: ScenarioKey, trajectory: Vec<f64>) {
        match self.index.get(&key) {
            Some(&position) => self.scenarios[position].1 = trajectory,
            None => {
                self.index.insert(key, self.scenarios.len());
                self.scenarios.push((key, trajectory));
            }
        }
    }

    /// Trajectory of one scenario
    pub fn get(&self, key: &ScenarioKey) -> Option<&[f64]> {
        self.index
            .get(key)
            .map(|&position| self.scenarios[position].1.as_slice())
    }

    /// Scenarios in grid order
    pub fn iter(&self) -> impl Iterator<Item = (&ScenarioKey, &[f64])> {
        self.scenarios
            .iter()
            .map(|(key, trajectory)| (key, trajectory.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Months per trajectory
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Profit level of the break-even reference line
    pub fn break_even(&self) -> f64 {
        BREAK_EVEN_PROFIT
    }

    /// Write one column per scenario and one row per future month
    pub fn write_csv<P: AsRef<Path>>(&self, path: P, months: &[NaiveDate]) -> Result<()> {
        if months.len() != self.horizon {
            return Err(ForecastError::InvalidData(format!(
                "Expected {} months for the sensitivity table, got {}",
                self.horizon,
                months.len()
            )));
        }

        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec!["Month".to_string()];
        header.extend(self.scenarios.iter().map(|(key, _)| key.label()));
        writer.write_record(&header)?;

        for (row, month) in months.iter().enumerate() {
            let mut record = vec![month_label(*month)];
            record.extend(
                self.scenarios
                    .iter()
                    .map(|(_, trajectory)| trajectory[row].to_string()),
            );
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
