use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{InstallmentPlan, PricingTier};
use super::resolver::ResolutionError;

/// Non-fatal observations about a schedule that administrators may want to review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleWarning {
    TotalBelowFullPrice {
        total: Decimal,
        full_price: Decimal,
    },
}

/// Per-payment amounts for an installment plan. Payments always sum to `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    pub plan: InstallmentPlan,
    pub total: Decimal,
    pub payments: Vec<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScheduleWarning>,
}

impl InstallmentSchedule {
    pub fn sum(&self) -> Decimal {
        self.payments.iter().copied().sum()
    }
}

/// Splits installment totals into equal payments, to the penny.
#[derive(Debug, Clone, Copy)]
pub struct InstallmentCalculator {
    log_below_full_price: bool,
}

impl Default for InstallmentCalculator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InstallmentCalculator {
    pub fn new(log_below_full_price: bool) -> Self {
        Self {
            log_below_full_price,
        }
    }

    pub fn schedule(
        &self,
        tier: &PricingTier,
        plan: InstallmentPlan,
    ) -> Result<InstallmentSchedule, ResolutionError> {
        let total = tier
            .installment_total(plan)
            .filter(|total| tier.installment_enabled(plan) && *total > Decimal::ZERO)
            .ok_or_else(|| ResolutionError::PlanUnavailable {
                tier: tier.name.clone(),
                plan,
            })?;

        let payments = split_evenly(total, plan.payments());

        let mut warnings = Vec::new();
        if total < tier.full_price {
            if self.log_below_full_price {
                warn!(
                    tier = %tier.name,
                    %plan,
                    %total,
                    full_price = %tier.full_price,
                    "installment total undercuts the full price"
                );
            }
            warnings.push(ScheduleWarning::TotalBelowFullPrice {
                total,
                full_price: tier.full_price,
            });
        }

        Ok(InstallmentSchedule {
            plan,
            total,
            payments,
            warnings,
        })
    }
}

/// Equal payments rounded to the nearest penny; the final payment takes up the difference.
fn split_evenly(total: Decimal, count: u32) -> Vec<Decimal> {
    let count_dec = Decimal::from(count);
    let share = total / count_dec;
    let leading = Decimal::from(count - 1);

    let mut base = share.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Rounding up on tiny totals could leave the last payment negative.
    if base * leading > total {
        base = share.round_dp_with_strategy(2, RoundingStrategy::ToZero);
    }

    let mut payments = vec![base; (count - 1) as usize];
    payments.push(total - base * leading);
    payments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier() -> PricingTier {
        PricingTier::new("Early", 3, Decimal::new(100, 0))
            .with_installments(InstallmentPlan::Three, Decimal::new(110, 0))
            .with_installments(InstallmentPlan::Six, Decimal::new(12000, 2))
    }

    #[test]
    fn three_payment_schedule_absorbs_remainder_in_last_payment() {
        let schedule = InstallmentCalculator::default()
            .schedule(&tier(), InstallmentPlan::Three)
            .expect("plan enabled");
        assert_eq!(
            schedule.payments,
            vec![
                Decimal::new(3667, 2),
                Decimal::new(3667, 2),
                Decimal::new(3666, 2)
            ]
        );
        assert_eq!(schedule.sum(), Decimal::new(110, 0));
        assert!(schedule.warnings.is_empty());
    }

    #[test]
    fn six_payment_schedule_divides_evenly() {
        let schedule = InstallmentCalculator::default()
            .schedule(&tier(), InstallmentPlan::Six)
            .expect("plan enabled");
        assert_eq!(schedule.payments, vec![Decimal::new(2000, 2); 6]);
    }

    #[test]
    fn schedules_never_drift_from_total() {
        let calculator = InstallmentCalculator::new(false);
        for cents in [1_i64, 4, 5, 99, 10_001, 12_345, 33_333, 100_000, 999_999] {
            let total = Decimal::new(cents, 2);
            let tier = PricingTier::new("Any", 0, Decimal::new(1, 2))
                .with_installments(InstallmentPlan::Three, total)
                .with_installments(InstallmentPlan::Six, total);
            for plan in [InstallmentPlan::Three, InstallmentPlan::Six] {
                let schedule = calculator.schedule(&tier, plan).expect("plan enabled");
                assert_eq!(schedule.payments.len(), plan.payments() as usize);
                assert_eq!(schedule.sum(), total, "{plan} of {total}");
                assert!(schedule.payments.iter().all(|p| *p >= Decimal::ZERO));
            }
        }
    }

    #[test]
    fn disabled_plan_is_unavailable() {
        let mut tier = tier();
        tier.installment_3_enabled = false;
        let err = InstallmentCalculator::default()
            .schedule(&tier, InstallmentPlan::Three)
            .expect_err("plan disabled");
        assert_eq!(
            err,
            ResolutionError::PlanUnavailable {
                tier: "Early".to_string(),
                plan: InstallmentPlan::Three,
            }
        );
    }

    #[test]
    fn enabled_plan_without_total_is_unavailable() {
        let mut tier = tier();
        tier.installment_6_total = None;
        assert!(matches!(
            InstallmentCalculator::default().schedule(&tier, InstallmentPlan::Six),
            Err(ResolutionError::PlanUnavailable { .. })
        ));
    }

    #[test]
    fn total_below_full_price_is_flagged_not_rejected() {
        let tier = PricingTier::new("Discounted", 0, Decimal::new(150, 0))
            .with_installments(InstallmentPlan::Three, Decimal::new(120, 0));
        let schedule = InstallmentCalculator::new(false)
            .schedule(&tier, InstallmentPlan::Three)
            .expect("still schedulable");
        assert_eq!(schedule.sum(), Decimal::new(120, 0));
        assert_eq!(
            schedule.warnings,
            vec![ScheduleWarning::TotalBelowFullPrice {
                total: Decimal::new(120, 0),
                full_price: Decimal::new(150, 0),
            }]
        );
    }
}
