//! # SaaS Dataset
//!
//! `saas_dataset` provides the monthly SaaS business metrics record used by the
//! analysis tools, a reproducible synthetic generator and CSV reading/writing.
//!
//! ## Usage Example
//!
//! ```no_run
//! use saas_dataset::{write_csv, DatasetGenerator};
//!
//! let records = DatasetGenerator::default().with_seed(7).generate().unwrap();
//! write_csv("saas_dataset.csv", &records).unwrap();
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub mod generator;

pub use generator::{DatasetGenerator, YearProfile, YEAR_PROFILES};

/// Errors that can occur while generating or storing a dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, DatasetError>;

/// One month of SaaS business metrics.
///
/// Field renames are the CSV column names the analysis tools expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaasRecord {
    #[serde(rename = "Month")]
    pub month: NaiveDate,

    #[serde(rename = "New_Subscribers_Basic")]
    pub new_subscribers_basic: i64,
    #[serde(rename = "New_Subscribers_Premium")]
    pub new_subscribers_premium: i64,
    #[serde(rename = "New_Subscribers_Enterprise")]
    pub new_subscribers_enterprise: i64,

    #[serde(rename = "Cancellations_Basic")]
    pub cancellations_basic: i64,
    #[serde(rename = "Cancellations_Premium")]
    pub cancellations_premium: i64,
    #[serde(rename = "Cancellations_Enterprise")]
    pub cancellations_enterprise: i64,

    #[serde(rename = "MRR_Basic")]
    pub mrr_basic: i64,
    #[serde(rename = "MRR_Premium")]
    pub mrr_premium: i64,
    #[serde(rename = "MRR_Enterprise")]
    pub mrr_enterprise: i64,

    #[serde(rename = "Marketing_Spend")]
    pub marketing_spend: i64,
    #[serde(rename = "New_Customers")]
    pub new_customers: i64,

    #[serde(rename = "Fixed_Costs")]
    pub fixed_costs: i64,
    #[serde(rename = "Variable_Costs")]
    pub variable_costs: i64,

    #[serde(rename = "Churn_Rate_Basic")]
    pub churn_rate_basic: f64,
    #[serde(rename = "Churn_Rate_Premium")]
    pub churn_rate_premium: f64,
    #[serde(rename = "Churn_Rate_Enterprise")]
    pub churn_rate_enterprise: f64,

    #[serde(rename = "Customer_Type")]
    pub customer_type: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "One_Time_Fees")]
    pub one_time_fees: i64,
    #[serde(rename = "Discounts_Given")]
    pub discounts_given: i64,
    #[serde(rename = "Churn_Reason")]
    pub churn_reason: String,
    #[serde(rename = "Upsell_Completed")]
    pub upsell_completed: i64,
    #[serde(rename = "NPS_Score")]
    pub nps_score: i64,
    #[serde(rename = "Monthly_Active_Users")]
    pub monthly_active_users: i64,
    #[serde(rename = "Churn_Recovery_Rate")]
    pub churn_recovery_rate: f64,
    #[serde(rename = "Upsell_Rate")]
    pub upsell_rate: f64,
    #[serde(rename = "Additional_Features_Purchased")]
    pub additional_features_purchased: i64,
}

impl SaasRecord {
    /// New subscribers across all tiers minus cancellations across all tiers
    pub fn net_new_subscribers(&self) -> i64 {
        self.new_subscribers_basic + self.new_subscribers_premium + self.new_subscribers_enterprise
            - (self.cancellations_basic + self.cancellations_premium + self.cancellations_enterprise)
    }
}

/// Write records to a CSV file with a header row
pub fn write_csv<P: AsRef<Path>>(path: P, records: &[SaasRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Read records back from a CSV file written by [`write_csv`]
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<SaasRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }

    Ok(records)
}
