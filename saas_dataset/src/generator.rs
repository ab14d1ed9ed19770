//! Synthetic dataset generation
//!
//! Each block of twelve rows, counted from the start month, draws from its own
//! [`YearProfile`]. The
//! five built-in profiles describe 2019 through 2023: a baseline year, a
//! pandemic-driven growth year with heavier marketing, and a gradual
//! normalisation. Datasets longer than five years keep using the last profile.
//! Integer ranges are half-open, like `lo..hi`.

use crate::{DatasetError, Result, SaasRecord};
use chrono::{Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Uniform;

const CUSTOMER_TYPES: [&str; 3] = ["Small Business", "Medium Business", "Enterprise"];
const REGIONS: [&str; 3] = ["North America", "Europe", "Asia"];
const CHURN_REASONS: [&str; 4] = [
    "Price",
    "Lack of Features",
    "Competitor Product",
    "Customer Support",
];

/// Value ranges used for one year of generated data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearProfile {
    pub new_subscribers_basic: (i64, i64),
    pub new_subscribers_premium: (i64, i64),
    pub new_subscribers_enterprise: (i64, i64),
    pub mrr_basic: (i64, i64),
    pub mrr_premium: (i64, i64),
    pub mrr_enterprise: (i64, i64),
    pub marketing_spend: (i64, i64),
    pub new_customers: (i64, i64),
    pub churn_rate_basic: (f64, f64),
    pub churn_rate_premium: (f64, f64),
    pub churn_rate_enterprise: (f64, f64),
}

/// Built-in profiles for five consecutive years
pub const YEAR_PROFILES: [YearProfile; 5] = [
    YearProfile {
        new_subscribers_basic: (500, 1000),
        new_subscribers_premium: (300, 700),
        new_subscribers_enterprise: (50, 200),
        mrr_basic: (8000, 20000),
        mrr_premium: (20000, 40000),
        mrr_enterprise: (50000, 80000),
        marketing_spend: (10000, 25000),
        new_customers: (600, 1200),
        churn_rate_basic: (0.03, 0.06),
        churn_rate_premium: (0.01, 0.03),
        churn_rate_enterprise: (0.005, 0.02),
    },
    YearProfile {
        new_subscribers_basic: (800, 1500),
        new_subscribers_premium: (500, 1000),
        new_subscribers_enterprise: (80, 250),
        mrr_basic: (10000, 22000),
        mrr_premium: (25000, 45000),
        mrr_enterprise: (55000, 85000),
        marketing_spend: (15000, 30000),
        new_customers: (800, 1500),
        churn_rate_basic: (0.02, 0.05),
        churn_rate_premium: (0.01, 0.02),
        churn_rate_enterprise: (0.004, 0.015),
    },
    YearProfile {
        new_subscribers_basic: (700, 1200),
        new_subscribers_premium: (400, 900),
        new_subscribers_enterprise: (70, 220),
        mrr_basic: (12000, 24000),
        mrr_premium: (27000, 47000),
        mrr_enterprise: (60000, 90000),
        marketing_spend: (12000, 25000),
        new_customers: (700, 1400),
        churn_rate_basic: (0.03, 0.06),
        churn_rate_premium: (0.01, 0.03),
        churn_rate_enterprise: (0.005, 0.02),
    },
    YearProfile {
        new_subscribers_basic: (600, 1100),
        new_subscribers_premium: (350, 800),
        new_subscribers_enterprise: (60, 200),
        mrr_basic: (11000, 23000),
        mrr_premium: (26000, 46000),
        mrr_enterprise: (58000, 88000),
        marketing_spend: (10000, 20000),
        new_customers: (650, 1300),
        churn_rate_basic: (0.03, 0.06),
        churn_rate_premium: (0.01, 0.03),
        churn_rate_enterprise: (0.005, 0.02),
    },
    YearProfile {
        new_subscribers_basic: (500, 1000),
        new_subscribers_premium: (300, 700),
        new_subscribers_enterprise: (50, 180),
        mrr_basic: (10000, 22000),
        mrr_premium: (25000, 45000),
        mrr_enterprise: (55000, 85000),
        marketing_spend: (9000, 18000),
        new_customers: (600, 1200),
        churn_rate_basic: (0.03, 0.06),
        churn_rate_premium: (0.01, 0.03),
        churn_rate_enterprise: (0.005, 0.02),
    },
];

/// Generator for monthly SaaS records
#[derive(Debug, Clone)]
pub struct DatasetGenerator {
    start: NaiveDate,
    months: usize,
    seed: Option<u64>,
}

impl Default for DatasetGenerator {
    /// Sixty months starting January 2019
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default(),
            months: 60,
            seed: None,
        }
    }
}

impl DatasetGenerator {
    /// Create a generator for `months` months starting at `year`-`month`
    pub fn new(year: i32, month: u32, months: usize) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            DatasetError::InvalidParameter(format!("Invalid start month {}-{:02}", year, month))
        })?;

        if months == 0 {
            return Err(DatasetError::InvalidParameter(
                "Number of months must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            start,
            months,
            seed: None,
        })
    }

    /// Use a fixed seed so repeated runs produce the same data
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of months this generator produces
    pub fn months(&self) -> usize {
        self.months
    }

    /// Last calendar day of the `offset`-th month after the start month
    fn month_end(&self, offset: usize) -> Result<NaiveDate> {
        let offset = u32::try_from(offset + 1).map_err(|_| {
            DatasetError::InvalidParameter("Month offset out of range".to_string())
        })?;

        self.start
            .checked_add_months(Months::new(offset))
            .and_then(|first_of_next| first_of_next.pred_opt())
            .ok_or_else(|| {
                DatasetError::InvalidParameter(format!(
                    "Month {} after {} is out of the calendar range",
                    offset, self.start
                ))
            })
    }

    /// Generate the records
    pub fn generate(&self) -> Result<Vec<SaasRecord>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut records = Vec::with_capacity(self.months);

        for offset in 0..self.months {
            let month = self.month_end(offset)?;
            let profile = &YEAR_PROFILES[(offset / 12).min(YEAR_PROFILES.len() - 1)];

            let mut record = SaasRecord {
                month,
                new_subscribers_basic: draw_int(&mut rng, profile.new_subscribers_basic),
                new_subscribers_premium: draw_int(&mut rng, profile.new_subscribers_premium),
                new_subscribers_enterprise: draw_int(&mut rng, profile.new_subscribers_enterprise),
                cancellations_basic: draw_int(&mut rng, (100, 500)),
                cancellations_premium: draw_int(&mut rng, (50, 300)),
                cancellations_enterprise: draw_int(&mut rng, (10, 100)),
                mrr_basic: draw_int(&mut rng, profile.mrr_basic),
                mrr_premium: draw_int(&mut rng, profile.mrr_premium),
                mrr_enterprise: draw_int(&mut rng, profile.mrr_enterprise),
                marketing_spend: draw_int(&mut rng, profile.marketing_spend),
                new_customers: draw_int(&mut rng, profile.new_customers),
                fixed_costs: draw_int(&mut rng, (15000, 30000)),
                variable_costs: draw_int(&mut rng, (10000, 25000)),
                churn_rate_basic: draw_float(&mut rng, profile.churn_rate_basic),
                churn_rate_premium: draw_float(&mut rng, profile.churn_rate_premium),
                churn_rate_enterprise: draw_float(&mut rng, profile.churn_rate_enterprise),
                customer_type: pick(&mut rng, &CUSTOMER_TYPES),
                region: pick(&mut rng, &REGIONS),
                one_time_fees: draw_int(&mut rng, (0, 5000)),
                discounts_given: draw_int(&mut rng, (0, 2000)),
                churn_reason: pick(&mut rng, &CHURN_REASONS),
                upsell_completed: draw_int(&mut rng, (0, 2)),
                nps_score: draw_int(&mut rng, (0, 10)),
                monthly_active_users: 0,
                churn_recovery_rate: draw_float(&mut rng, (0.1, 0.3)),
                upsell_rate: draw_float(&mut rng, (0.05, 0.15)),
                additional_features_purchased: draw_int(&mut rng, (0, 5)),
            };
            record.monthly_active_users = record.net_new_subscribers();

            records.push(record);
        }

        Ok(records)
    }
}

fn draw_int(rng: &mut StdRng, (low, high): (i64, i64)) -> i64 {
    rng.gen_range(low..high)
}

fn draw_float(rng: &mut StdRng, (low, high): (f64, f64)) -> f64 {
    rng.sample(Uniform::new(low, high))
}

fn pick(rng: &mut StdRng, choices: &[&str]) -> String {
    choices[rng.gen_range(0..choices.len())].to_string()
}
