use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RegistrationConfig;
use crate::event::EventId;
use crate::store::RepositoryError;

use super::domain::{ApplicationType, InstallmentPlan, PricingTier, TierTable};
use super::installments::{InstallmentCalculator, InstallmentSchedule};
use super::repository::PricingSettingsRepository;
use super::resolver::{whole_months_between, ResolutionError, TierResolver};
use super::table::TierTableError;

/// Price applicable to a registration, with an optional payment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub application_type: ApplicationType,
    pub event_start: NaiveDate,
    pub as_of: NaiveDate,
    pub lead_months: u32,
    pub tier: PricingTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<InstallmentSchedule>,
}

/// Service composing the settings repository with the resolver and installment calculator.
pub struct PricingService<R> {
    repository: Arc<R>,
    resolver: TierResolver,
    calculator: InstallmentCalculator,
}

impl<R> PricingService<R>
where
    R: PricingSettingsRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: &RegistrationConfig) -> Self {
        Self {
            repository,
            resolver: TierResolver::new(),
            calculator: InstallmentCalculator::new(config.warn_below_full_price),
        }
    }

    /// Validate and persist a whole tier table. Nothing is written when validation fails.
    pub fn save_table(
        &self,
        event_id: &EventId,
        table: TierTable,
    ) -> Result<TierTable, PricingServiceError> {
        table.validate()?;
        self.repository.put(event_id, table.clone())?;
        info!(
            %event_id,
            application_type = %table.application_type,
            tiers = table.tiers.len(),
            "tier table saved"
        );
        Ok(table)
    }

    pub fn load_table(
        &self,
        event_id: &EventId,
        application_type: &ApplicationType,
    ) -> Result<TierTable, PricingServiceError> {
        let table = self
            .repository
            .get(event_id, application_type)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(table)
    }

    pub fn remove_table(
        &self,
        event_id: &EventId,
        application_type: &ApplicationType,
    ) -> Result<(), PricingServiceError> {
        self.repository.delete(event_id, application_type)?;
        info!(%event_id, %application_type, "tier table removed");
        Ok(())
    }

    /// Resolve the tier for a registration on `as_of` and, when asked, its payment schedule.
    pub fn quote(
        &self,
        event_id: &EventId,
        application_type: &ApplicationType,
        event_start: NaiveDate,
        as_of: NaiveDate,
        plan: Option<InstallmentPlan>,
    ) -> Result<PriceQuote, PricingServiceError> {
        let table = self.load_table(event_id, application_type)?;
        let tier = self.resolver.resolve(&table, event_start, as_of)?;

        let schedule = plan
            .map(|plan| self.calculator.schedule(tier, plan))
            .transpose()?;

        Ok(PriceQuote {
            application_type: table.application_type.clone(),
            event_start,
            as_of,
            lead_months: whole_months_between(as_of, event_start),
            tier: tier.clone(),
            schedule,
        })
    }
}

/// Error raised by the pricing service.
#[derive(Debug, thiserror::Error)]
pub enum PricingServiceError {
    #[error(transparent)]
    Validation(#[from] TierTableError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
