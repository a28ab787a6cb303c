use std::fmt;

use rust_decimal::Decimal;

use super::domain::{ApplicationType, InstallmentPlan, PricingTier, TierTable};

/// Field-level problem found on a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierProblem {
    EmptyName,
    NonPositiveFullPrice,
    SubPennyFullPrice,
    MissingInstallmentTotal(InstallmentPlan),
    SubPennyInstallmentTotal(InstallmentPlan),
}

impl TierProblem {
    /// Name of the offending field as persisted.
    pub const fn field(self) -> &'static str {
        match self {
            TierProblem::EmptyName => "name",
            TierProblem::NonPositiveFullPrice | TierProblem::SubPennyFullPrice => "fullPrice",
            TierProblem::MissingInstallmentTotal(InstallmentPlan::Three)
            | TierProblem::SubPennyInstallmentTotal(InstallmentPlan::Three) => "installment3Total",
            TierProblem::MissingInstallmentTotal(InstallmentPlan::Six)
            | TierProblem::SubPennyInstallmentTotal(InstallmentPlan::Six) => "installment6Total",
        }
    }
}

impl fmt::Display for TierProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierProblem::EmptyName => write!(f, "name must not be empty"),
            TierProblem::NonPositiveFullPrice => write!(f, "full price must be greater than zero"),
            TierProblem::SubPennyFullPrice => {
                write!(f, "full price must be a whole number of pence")
            }
            TierProblem::MissingInstallmentTotal(plan) => {
                write!(f, "{plan} is enabled without a positive total")
            }
            TierProblem::SubPennyInstallmentTotal(plan) => {
                write!(f, "{plan} total must be a whole number of pence")
            }
        }
    }
}

/// Validation failures for a tier table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TierTableError {
    #[error("tier {index} ({name:?}) is invalid: {problem}")]
    InvalidTier {
        index: usize,
        name: String,
        problem: TierProblem,
    },
    #[error("registration fees are enabled for {0} but no tiers are defined")]
    EmptyTable(ApplicationType),
}

impl TierTableError {
    pub fn field(&self) -> &'static str {
        match self {
            TierTableError::InvalidTier { problem, .. } => problem.field(),
            TierTableError::EmptyTable(_) => "tiers",
        }
    }
}

/// Amounts are charged in pence; trailing zeros past the second place are fine.
pub(crate) fn whole_pence(amount: Decimal) -> bool {
    amount.round_dp(2) == amount
}

impl PricingTier {
    fn problem(&self) -> Option<TierProblem> {
        if self.name.trim().is_empty() {
            return Some(TierProblem::EmptyName);
        }

        if self.full_price <= Decimal::ZERO {
            return Some(TierProblem::NonPositiveFullPrice);
        }
        if !whole_pence(self.full_price) {
            return Some(TierProblem::SubPennyFullPrice);
        }

        let plans = [InstallmentPlan::Three, InstallmentPlan::Six];
        if let Some(plan) = plans.into_iter().find(|plan| {
            self.installment_total(*plan)
                .is_some_and(|total| !whole_pence(total))
        }) {
            return Some(TierProblem::SubPennyInstallmentTotal(plan));
        }

        plans
            .into_iter()
            .filter(|plan| self.installment_enabled(*plan))
            .find(|plan| {
                self.installment_total(*plan)
                    .map_or(true, |total| total <= Decimal::ZERO)
            })
            .map(TierProblem::MissingInstallmentTotal)
    }
}

impl TierTable {
    /// Reject tables that could resolve to a non-positive or missing price.
    pub fn validate(&self) -> Result<(), TierTableError> {
        if let Some((index, tier, problem)) = self
            .tiers
            .iter()
            .enumerate()
            .find_map(|(index, tier)| tier.problem().map(|problem| (index, tier, problem)))
        {
            return Err(TierTableError::InvalidTier {
                index,
                name: tier.name.clone(),
                problem,
            });
        }

        if self.enabled && self.tiers.is_empty() {
            return Err(TierTableError::EmptyTable(self.application_type.clone()));
        }

        Ok(())
    }

    /// Tiers ordered by lead time, longest first. Equal thresholds keep declaration order.
    pub fn sorted_descending_by_lead_time(&self) -> Vec<&PricingTier> {
        let mut tiers: Vec<&PricingTier> = self.tiers.iter().collect();
        tiers.sort_by(|a, b| b.months_before_event.cmp(&a.months_before_event));
        tiers
    }
}
