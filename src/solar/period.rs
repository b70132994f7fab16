use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Span of time covered by the consumption figure on a bill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    /// One month.
    Monthly,
    /// Two months.
    #[default]
    Bimonthly,
}

impl BillingPeriod {
    pub const ALL: [BillingPeriod; 2] = [BillingPeriod::Monthly, BillingPeriod::Bimonthly];

    pub fn as_code(self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Bimonthly => "bimonthly",
        }
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Free text that names no known billing period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown billing period: {0} (expected monthly or bimonthly)")]
pub struct ParsePeriodError(pub String);

impl FromStr for BillingPeriod {
    type Err = ParsePeriodError;

    /// Accepts the English and Spanish names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "mensual" | "1" => Ok(BillingPeriod::Monthly),
            "bimonthly" | "bimestral" | "2" => Ok(BillingPeriod::Bimonthly),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}
