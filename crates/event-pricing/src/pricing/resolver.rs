use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use super::domain::{ApplicationType, InstallmentPlan, PricingTier, TierTable};
use super::table::TierTableError;

/// Reasons a price or payment plan could not be produced. Callers must block checkout rather
/// than fall back to a default price.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("registration fees are disabled for {0}")]
    TierDisabled(ApplicationType),
    #[error("no pricing tier for {application_type} applies with {lead_months} month(s) of lead time")]
    NoApplicableTier {
        application_type: ApplicationType,
        lead_months: u32,
    },
    #[error("{plan} is not available on tier {tier:?}")]
    PlanUnavailable { tier: String, plan: InstallmentPlan },
    #[error(transparent)]
    InvalidTable(#[from] TierTableError),
}

/// Whole calendar months from `from` until `to`, rounded down.
///
/// A month is counted once `from` advanced by that many months (clamped to the end of shorter
/// months) does not pass `to`. Dates on or after `to` yield zero.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if from >= to {
        return 0;
    }

    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    while months > 0 {
        match from.checked_add_months(Months::new(months as u32)) {
            Some(date) if date <= to => break,
            _ => months -= 1,
        }
    }

    months.max(0) as u32
}

/// Selects the tier that applies to a registration made on a given date.
#[derive(Debug, Default, Clone, Copy)]
pub struct TierResolver;

impl TierResolver {
    pub fn new() -> Self {
        Self
    }

    /// Pick the tier with the largest threshold the registration's lead time still meets.
    ///
    /// Registrations on or after the event start have zero lead time, so a zero-month tier
    /// always catches them.
    pub fn resolve<'a>(
        &self,
        table: &'a TierTable,
        event_start: NaiveDate,
        as_of: NaiveDate,
    ) -> Result<&'a PricingTier, ResolutionError> {
        if !table.enabled {
            return Err(ResolutionError::TierDisabled(table.application_type.clone()));
        }
        table.validate()?;

        let lead_months = whole_months_between(as_of, event_start);
        let tier = table
            .sorted_descending_by_lead_time()
            .into_iter()
            .find(|tier| tier.months_before_event <= lead_months)
            .ok_or_else(|| ResolutionError::NoApplicableTier {
                application_type: table.application_type.clone(),
                lead_months,
            })?;

        debug!(
            application_type = %table.application_type,
            lead_months,
            tier = %tier.name,
            "resolved pricing tier"
        );

        Ok(tier)
    }
}
