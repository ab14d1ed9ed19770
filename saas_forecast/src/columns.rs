//! Column names of the monthly metrics table

/// Calendar month of the observation
pub const MONTH: &str = "Month";

pub const MARKETING_SPEND: &str = "Marketing_Spend";
pub const NEW_CUSTOMERS: &str = "New_Customers";
pub const FIXED_COSTS: &str = "Fixed_Costs";
pub const VARIABLE_COSTS: &str = "Variable_Costs";
pub const UPSELL_COMPLETED: &str = "Upsell_Completed";
pub const UPSELL_RATE: &str = "Upsell_Rate";
pub const NPS_SCORE: &str = "NPS_Score";

// Derived columns
pub const TOTAL_SUBSCRIBERS: &str = "Total_Subscribers";
pub const NET_NEW_SUBSCRIBERS: &str = "Net_New_Subscribers";
pub const TOTAL_MRR: &str = "Total_MRR";
pub const CLV: &str = "CLV";

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Basic,
    Premium,
    Enterprise,
}

impl Tier {
    /// All tiers in reporting order
    pub const ALL: [Tier; 3] = [Tier::Basic, Tier::Premium, Tier::Enterprise];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Basic => "Basic",
            Tier::Premium => "Premium",
            Tier::Enterprise => "Enterprise",
        }
    }

    pub fn new_subscribers(&self) -> &'static str {
        match self {
            Tier::Basic => "New_Subscribers_Basic",
            Tier::Premium => "New_Subscribers_Premium",
            Tier::Enterprise => "New_Subscribers_Enterprise",
        }
    }

    pub fn cancellations(&self) -> &'static str {
        match self {
            Tier::Basic => "Cancellations_Basic",
            Tier::Premium => "Cancellations_Premium",
            Tier::Enterprise => "Cancellations_Enterprise",
        }
    }

    pub fn mrr(&self) -> &'static str {
        match self {
            Tier::Basic => "MRR_Basic",
            Tier::Premium => "MRR_Premium",
            Tier::Enterprise => "MRR_Enterprise",
        }
    }

    pub fn churn_rate(&self) -> &'static str {
        match self {
            Tier::Basic => "Churn_Rate_Basic",
            Tier::Premium => "Churn_Rate_Premium",
            Tier::Enterprise => "Churn_Rate_Enterprise",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A value per subscription tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierValues {
    pub basic: f64,
    pub premium: f64,
    pub enterprise: f64,
}

impl TierValues {
    pub fn get(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Basic => self.basic,
            Tier::Premium => self.premium,
            Tier::Enterprise => self.enterprise,
        }
    }

    /// Build from a fallible per-tier computation
    pub fn try_from_fn<E, F>(mut f: F) -> Result<Self, E>
    where
        F: FnMut(Tier) -> Result<f64, E>,
    {
        Ok(Self {
            basic: f(Tier::Basic)?,
            premium: f(Tier::Premium)?,
            enterprise: f(Tier::Enterprise)?,
        })
    }
}
