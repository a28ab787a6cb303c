use crate::event::EventId;
use crate::store::RepositoryError;

use super::domain::{ApplicationType, TierTable};

/// Persistence collaborator holding one tier table per event and application type.
pub trait PricingSettingsRepository: Send + Sync {
    fn get(
        &self,
        event_id: &EventId,
        application_type: &ApplicationType,
    ) -> Result<Option<TierTable>, RepositoryError>;

    /// Replace the whole table stored for `table.application_type`.
    fn put(&self, event_id: &EventId, table: TierTable) -> Result<(), RepositoryError>;

    /// Drop the table once the application type stops charging fees.
    fn delete(
        &self,
        event_id: &EventId,
        application_type: &ApplicationType,
    ) -> Result<(), RepositoryError>;
}
