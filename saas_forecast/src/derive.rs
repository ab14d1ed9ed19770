//! Derived metric columns
//!
//! All derived columns are row-wise functions of raw columns of the same row.
//! [`derive_metrics`] never mutates its input: it returns a new table with the
//! derived columns appended, replacing earlier derived columns of the same
//! name, so applying it twice gives the same result as applying it once.

use crate::columns::{self, Tier};
use crate::data::MetricTable;
use crate::error::Result;

/// Stand-in churn rate used when the CLV denominator is exactly zero.
///
/// This is a fixed approximation to avoid dividing by zero, not a
/// statistically derived figure.
pub const CLV_CHURN_EPSILON: f64 = 0.001;

/// Churn column used as the CLV denominator
pub const CLV_CHURN_COLUMN: &str = "Churn_Rate_Basic";

/// Derived series aligned row for row with the source table
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    /// New subscribers minus cancellations, summed over tiers
    pub total_subscribers: Vec<f64>,
    /// Sum of per-tier recurring revenue
    pub total_mrr: Vec<f64>,
    /// Lifetime-value proxy: total MRR over churn rate
    pub clv: Vec<f64>,
}

impl DerivedMetrics {
    /// Compute the derived series from the raw columns of `table`
    pub fn compute(table: &MetricTable) -> Result<Self> {
        let rows = table.len();

        let mut new_total = vec![0.0; rows];
        let mut cancelled_total = vec![0.0; rows];
        let mut total_mrr = vec![0.0; rows];

        for tier in Tier::ALL {
            let new_subscribers = table.column_f64(tier.new_subscribers())?;
            let cancellations = table.column_f64(tier.cancellations())?;
            let mrr = table.column_f64(tier.mrr())?;

            for row in 0..rows {
                new_total[row] += new_subscribers[row];
                cancelled_total[row] += cancellations[row];
                total_mrr[row] += mrr[row];
            }
        }

        let total_subscribers = new_total
            .iter()
            .zip(cancelled_total.iter())
            .map(|(new, cancelled)| new - cancelled)
            .collect();

        let churn = table.column_f64(CLV_CHURN_COLUMN)?;
        let clv = lifetime_value(&total_mrr, &churn);

        Ok(Self {
            total_subscribers,
            total_mrr,
            clv,
        })
    }
}

/// `mrr / churn`, substituting [`CLV_CHURN_EPSILON`] for a zero churn rate
pub fn lifetime_value(total_mrr: &[f64], churn_rate: &[f64]) -> Vec<f64> {
    total_mrr
        .iter()
        .zip(churn_rate.iter())
        .map(|(&mrr, &churn)| {
            let churn = if churn == 0.0 { CLV_CHURN_EPSILON } else { churn };
            mrr / churn
        })
        .collect()
}

/// Return a copy of `table` with `Total_Subscribers`, `Net_New_Subscribers`,
/// `Total_MRR` and `CLV` columns
pub fn derive_metrics(table: &MetricTable) -> Result<MetricTable> {
    let derived = DerivedMetrics::compute(table)?;

    tracing::debug!(rows = table.len(), "derived subscriber, MRR and CLV columns");

    table.with_columns(vec![
        (columns::TOTAL_SUBSCRIBERS, derived.total_subscribers.clone()),
        (columns::NET_NEW_SUBSCRIBERS, derived.total_subscribers),
        (columns::TOTAL_MRR, derived.total_mrr),
        (columns::CLV, derived.clv),
    ])
}
