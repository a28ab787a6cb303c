use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::RegistrationConfig;
use crate::event::EventId;
use crate::store::RepositoryError;

use super::availability::{Availability, AvailabilityEngine};
use super::catalog::{CatalogError, TicketCatalog};
use super::domain::{Remaining, TicketType, TicketTypeId};
use super::repository::{SalesSnapshotSource, TicketCatalogRepository};

/// Availability of one ticket type together with what a single order may contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAvailabilityView {
    pub ticket_type_id: TicketTypeId,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub availability: Availability,
    pub orderable_quantity: Remaining,
}

/// Service composing catalog storage, the sales feed, and the availability engine.
pub struct TicketService<C, S> {
    catalogs: Arc<C>,
    sales: Arc<S>,
    engine: AvailabilityEngine,
    copy_suffix: String,
}

impl<C, S> TicketService<C, S>
where
    C: TicketCatalogRepository + 'static,
    S: SalesSnapshotSource + 'static,
{
    pub fn new(catalogs: Arc<C>, sales: Arc<S>, config: &RegistrationConfig) -> Self {
        Self {
            catalogs,
            sales,
            engine: AvailabilityEngine::new(),
            copy_suffix: config.copy_suffix.clone(),
        }
    }

    /// Catalog for the event; events without ticket types yield an empty catalog.
    pub fn load_catalog(&self, event_id: &EventId) -> Result<TicketCatalog, TicketServiceError> {
        let catalog = self
            .catalogs
            .get(event_id)?
            .unwrap_or_else(|| TicketCatalog::new(event_id.clone()));
        Ok(catalog)
    }

    /// Replace every ticket type of an event. Nothing is written unless the whole list passes
    /// field validation and the dependency graph is closed and acyclic.
    pub fn save_catalog(
        &self,
        event_id: &EventId,
        ticket_types: Vec<TicketType>,
    ) -> Result<TicketCatalog, TicketServiceError> {
        let catalog =
            TicketCatalog::from_ticket_types(event_id.clone(), ticket_types).map_err(|err| {
                if err.is_integrity() {
                    warn!(%event_id, error = %err, "ticket catalog rejected");
                }
                err
            })?;

        self.catalogs.put(catalog.clone())?;
        info!(%event_id, ticket_types = catalog.len(), "ticket catalog saved");
        Ok(catalog)
    }

    pub fn upsert_ticket(
        &self,
        event_id: &EventId,
        ticket: TicketType,
    ) -> Result<TicketType, TicketServiceError> {
        let mut catalog = self.load_catalog(event_id)?;
        catalog.add_or_update(ticket.clone())?;
        self.catalogs.put(catalog)?;
        Ok(ticket)
    }

    /// Remove a ticket type, leaving dependents pointing at the missing id.
    pub fn remove_ticket(
        &self,
        event_id: &EventId,
        ticket_id: TicketTypeId,
    ) -> Result<Option<TicketType>, TicketServiceError> {
        let mut catalog = self.load_catalog(event_id)?;
        let removed = catalog.remove(ticket_id);
        if removed.is_some() {
            self.catalogs.put(catalog)?;
        }
        Ok(removed)
    }

    pub fn duplicate_ticket(
        &self,
        event_id: &EventId,
        ticket_id: TicketTypeId,
    ) -> Result<TicketType, TicketServiceError> {
        let mut catalog = self.load_catalog(event_id)?;
        let copy = catalog.duplicate_with_suffix(ticket_id, &self.copy_suffix)?;
        self.catalogs.put(catalog)?;
        Ok(copy)
    }

    /// Check whether `ticket_id` can be bought on `date` by a customer already holding
    /// the ticket types in `purchased`.
    pub fn availability(
        &self,
        event_id: &EventId,
        ticket_id: TicketTypeId,
        date: NaiveDate,
        purchased: &BTreeSet<TicketTypeId>,
    ) -> Result<TicketAvailabilityView, TicketServiceError> {
        let catalog = self.load_catalog(event_id)?;
        let ticket = catalog
            .get(ticket_id)
            .ok_or(CatalogError::UnknownTicket(ticket_id))?;

        let dependency_satisfied = catalog.dependency_satisfied(ticket, purchased);
        let sales = self.sales.snapshot(event_id, Some(ticket_id))?;
        let availability = self
            .engine
            .is_purchasable(ticket, date, &sales, dependency_satisfied);

        Ok(TicketAvailabilityView {
            ticket_type_id: ticket_id,
            date,
            orderable_quantity: availability.orderable_quantity(ticket),
            availability,
        })
    }
}

/// Error raised by the ticket service.
#[derive(Debug, thiserror::Error)]
pub enum TicketServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
