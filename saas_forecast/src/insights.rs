//! Descriptive business insights over a metric table
//!
//! Apart from the average churn rates, every ratio here divides by a sum or
//! a cell of the table and reports [`ForecastError::DivisionByZero`] instead
//! of producing infinities.

use crate::columns::{self, Tier, TierValues};
use crate::data::MetricTable;
use crate::error::{ForecastError, Result};
use saas_math::statistics::{nan_mean, nan_sum};

/// Mean churn rate per tier over all months, ignoring missing cells
pub fn average_churn_rates(table: &MetricTable) -> Result<TierValues> {
    TierValues::try_from_fn(|tier| {
        let values = table.column_f64(tier.churn_rate())?;
        nan_mean(&values).ok_or_else(|| {
            ForecastError::InvalidData(format!("Column '{}' has no values", tier.churn_rate()))
        })
    })
}

/// Total cancellations over total new subscribers, per tier. Missing cells
/// are left out of both sums.
pub fn segment_churn_ratios(table: &MetricTable) -> Result<TierValues> {
    TierValues::try_from_fn(|tier: Tier| {
        let cancellations = nan_sum(&table.column_f64(tier.cancellations())?);
        let new_subscribers = nan_sum(&table.column_f64(tier.new_subscribers())?);

        if new_subscribers == 0.0 {
            return Err(ForecastError::DivisionByZero(format!(
                "no new {} subscribers to compute segment churn",
                tier
            )));
        }

        Ok(cancellations / new_subscribers)
    })
}

/// Completed upsells over new customers, across the whole table
pub fn upsell_success_rate(table: &MetricTable) -> Result<f64> {
    let upsells = nan_sum(&table.column_f64(columns::UPSELL_COMPLETED)?);
    let customers = nan_sum(&table.column_f64(columns::NEW_CUSTOMERS)?);

    if customers == 0.0 {
        return Err(ForecastError::DivisionByZero(
            "no new customers to compute upsell success rate".to_string(),
        ));
    }

    Ok(upsells / customers)
}

/// Variable costs per new customer, month by month
pub fn variable_cost_per_customer(table: &MetricTable) -> Result<Vec<f64>> {
    let costs = table.column_f64(columns::VARIABLE_COSTS)?;
    let customers = table.column_f64(columns::NEW_CUSTOMERS)?;

    costs
        .iter()
        .zip(customers.iter())
        .zip(table.months().iter())
        .map(|((&cost, &count), month)| {
            if count == 0.0 {
                Err(ForecastError::DivisionByZero(format!(
                    "no new customers in {}",
                    month.format("%Y-%m")
                )))
            } else {
                Ok(cost / count)
            }
        })
        .collect()
}

/// Summary of the insights pass
#[derive(Debug, Clone)]
pub struct InsightSummary {
    /// Missing cell count per column
    pub missing_values: Vec<(String, usize)>,
    pub average_churn: TierValues,
    pub segment_churn: TierValues,
    pub upsell_success_rate: f64,
}

impl InsightSummary {
    /// Compute every scalar insight for `table`
    pub fn compute(table: &MetricTable) -> Result<Self> {
        Ok(Self {
            missing_values: table.null_counts(),
            average_churn: average_churn_rates(table)?,
            segment_churn: segment_churn_ratios(table)?,
            upsell_success_rate: upsell_success_rate(table)?,
        })
    }
}

impl std::fmt::Display for InsightSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Missing Values in Each Column:")?;
        for (column, count) in &self.missing_values {
            writeln!(f, "  {:<32} {}", column, count)?;
        }
        for tier in Tier::ALL {
            writeln!(
                f,
                "Average Churn Rate for {}: {:.2}%",
                tier,
                self.average_churn.get(tier) * 100.0
            )?;
        }
        writeln!(
            f,
            "Churn Rates by Segment: Basic {:.4}, Premium {:.4}, Enterprise {:.4}",
            self.segment_churn.basic, self.segment_churn.premium, self.segment_churn.enterprise
        )?;
        writeln!(f, "Upsell Success Rate: {:.4}", self.upsell_success_rate)
    }
}
