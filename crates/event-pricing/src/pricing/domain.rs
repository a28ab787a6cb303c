use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Application category a tier table applies to (artist, piercer, trader, caterer, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationType(pub String);

impl ApplicationType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A price that applies once a registration's lead time reaches `months_before_event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub name: String,
    pub months_before_event: u32,
    pub full_price: Decimal,
    #[serde(default, rename = "installment3Total")]
    pub installment_3_total: Option<Decimal>,
    #[serde(default, rename = "installment3Enabled")]
    pub installment_3_enabled: bool,
    #[serde(default, rename = "installment6Total")]
    pub installment_6_total: Option<Decimal>,
    #[serde(default, rename = "installment6Enabled")]
    pub installment_6_enabled: bool,
}

impl PricingTier {
    /// Tier with a full price only; installment plans disabled.
    pub fn new(name: impl Into<String>, months_before_event: u32, full_price: Decimal) -> Self {
        Self {
            name: name.into(),
            months_before_event,
            full_price,
            installment_3_total: None,
            installment_3_enabled: false,
            installment_6_total: None,
            installment_6_enabled: false,
        }
    }

    pub fn with_installments(mut self, plan: InstallmentPlan, total: Decimal) -> Self {
        match plan {
            InstallmentPlan::Three => {
                self.installment_3_total = Some(total);
                self.installment_3_enabled = true;
            }
            InstallmentPlan::Six => {
                self.installment_6_total = Some(total);
                self.installment_6_enabled = true;
            }
        }
        self
    }

    pub fn installment_enabled(&self, plan: InstallmentPlan) -> bool {
        match plan {
            InstallmentPlan::Three => self.installment_3_enabled,
            InstallmentPlan::Six => self.installment_6_enabled,
        }
    }

    pub fn installment_total(&self, plan: InstallmentPlan) -> Option<Decimal> {
        match plan {
            InstallmentPlan::Three => self.installment_3_total,
            InstallmentPlan::Six => self.installment_6_total,
        }
    }
}

/// Ordered pricing tiers for one application type of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierTable {
    pub application_type: ApplicationType,
    pub enabled: bool,
    pub tiers: Vec<PricingTier>,
}

impl TierTable {
    pub fn new(application_type: ApplicationType, tiers: Vec<PricingTier>) -> Self {
        Self {
            application_type,
            enabled: true,
            tiers,
        }
    }
}

/// Supported installment plan lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InstallmentPlan {
    Three,
    Six,
}

impl InstallmentPlan {
    pub const fn payments(self) -> u32 {
        match self {
            InstallmentPlan::Three => 3,
            InstallmentPlan::Six => 6,
        }
    }
}

impl fmt::Display for InstallmentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-payment plan", self.payments())
    }
}

impl TryFrom<u8> for InstallmentPlan {
    type Error = UnsupportedPlan;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(InstallmentPlan::Three),
            6 => Ok(InstallmentPlan::Six),
            other => Err(UnsupportedPlan(other)),
        }
    }
}

impl From<InstallmentPlan> for u8 {
    fn from(plan: InstallmentPlan) -> Self {
        plan.payments() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("installment plans come in 3 or 6 payments, not {0}")]
pub struct UnsupportedPlan(pub u8);
