//! Profit and cash-flow projections from a revenue forecast
//!
//! Costs are held at their last observed values for the whole horizon.

use crate::columns;
use crate::data::MetricTable;
use crate::error::{ForecastError, Result};
use serde::Serialize;

/// Last observed revenue and cost figures of a metric table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LastObserved {
    pub total_mrr: f64,
    pub fixed_costs: f64,
    pub variable_costs: f64,
    pub marketing_spend: f64,
}

impl LastObserved {
    /// Read the last row of a table that already carries `Total_MRR`
    pub fn from_table(table: &MetricTable) -> Result<Self> {
        let read = |name: &str| -> Result<f64> {
            let value = table.last_value(name)?;
            if !value.is_finite() {
                return Err(ForecastError::InvalidData(format!(
                    "Last value of '{}' is missing",
                    name
                )));
            }
            Ok(value)
        };

        Ok(Self {
            total_mrr: read(columns::TOTAL_MRR)?,
            fixed_costs: read(columns::FIXED_COSTS)?,
            variable_costs: read(columns::VARIABLE_COSTS)?,
            marketing_spend: read(columns::MARKETING_SPEND)?,
        })
    }

    /// Fixed plus variable costs
    pub fn operating_costs(&self) -> f64 {
        self.fixed_costs + self.variable_costs
    }

    /// Operating costs plus marketing spend
    pub fn cash_outflows(&self) -> f64 {
        self.operating_costs() + self.marketing_spend
    }
}

/// Revenue forecast minus fixed and variable costs
pub fn profit_forecast(revenue: &[f64], last: &LastObserved) -> Vec<f64> {
    let costs = last.operating_costs();
    revenue.iter().map(|r| r - costs).collect()
}

/// Revenue forecast minus fixed costs, variable costs and marketing spend
pub fn cash_flow_forecast(revenue: &[f64], last: &LastObserved) -> Vec<f64> {
    let outflows = last.cash_outflows();
    revenue.iter().map(|r| r - outflows).collect()
}
