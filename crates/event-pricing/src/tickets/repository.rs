use crate::event::EventId;
use crate::store::RepositoryError;

use super::catalog::TicketCatalog;
use super::domain::{SaleRecord, TicketTypeId};

/// Persistence collaborator for ticket catalogs, keyed by event.
pub trait TicketCatalogRepository: Send + Sync {
    fn get(&self, event_id: &EventId) -> Result<Option<TicketCatalog>, RepositoryError>;

    /// Replace the stored catalog for `catalog.event_id()`.
    fn put(&self, catalog: TicketCatalog) -> Result<(), RepositoryError>;
}

/// Read-only sales feed supplied by the order system.
pub trait SalesSnapshotSource: Send + Sync {
    fn snapshot(
        &self,
        event_id: &EventId,
        ticket_type_id: Option<TicketTypeId>,
    ) -> Result<Vec<SaleRecord>, RepositoryError>;
}
