use std::collections::{BTreeSet, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::event::EventId;
use crate::pricing::table::whole_pence;

use super::domain::{TicketType, TicketTypeId};

pub const DEFAULT_COPY_SUFFIX: &str = " (Copy)";

const MAX_MIN_AGE: u8 = 100;

/// Validation and integrity failures raised while editing a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("ticket {ticket} has an invalid {field}: {reason}")]
    InvalidTicket {
        ticket: TicketTypeId,
        field: &'static str,
        reason: &'static str,
    },
    #[error("ticket {ticket} depends on {dependency}, which is not in the catalog")]
    UnknownDependency {
        ticket: TicketTypeId,
        dependency: TicketTypeId,
    },
    #[error(
        "ticket {ticket} depends on itself through a chain of {} link(s)",
        .chain.len().saturating_sub(1)
    )]
    CyclicDependency {
        ticket: TicketTypeId,
        chain: Vec<TicketTypeId>,
    },
    #[error("ticket {0} appears more than once")]
    DuplicateTicket(TicketTypeId),
    #[error("ticket {0} is not in the catalog")]
    UnknownTicket(TicketTypeId),
}

impl CatalogError {
    /// True for failures that concern the dependency graph rather than a single ticket's fields.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            CatalogError::UnknownDependency { .. } | CatalogError::CyclicDependency { .. }
        )
    }
}

/// The ticket types offered for one event.
///
/// Deserialized catalogs are re-checked: field rules, duplicate ids and cycles are rejected.
/// Dangling dependencies are kept, since `remove` can legitimately leave them behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredCatalog")]
pub struct TicketCatalog {
    event_id: EventId,
    ticket_types: Vec<TicketType>,
}

impl TicketCatalog {
    pub fn new(event_id: EventId) -> Self {
        Self {
            event_id,
            ticket_types: Vec::new(),
        }
    }

    /// Build a catalog from a persisted list, checking every ticket and the dependency graph.
    /// Tickets may reference others listed after them.
    pub fn from_ticket_types(
        event_id: EventId,
        ticket_types: Vec<TicketType>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self::with_checked_fields(event_id, ticket_types)?;
        catalog.integrity_check()?;
        Ok(catalog)
    }

    fn with_checked_fields(
        event_id: EventId,
        ticket_types: Vec<TicketType>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for ticket in &ticket_types {
            validate_fields(ticket)?;
            if !seen.insert(ticket.id) {
                return Err(CatalogError::DuplicateTicket(ticket.id));
            }
        }

        Ok(Self {
            event_id,
            ticket_types,
        })
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn ticket_types(&self) -> &[TicketType] {
        &self.ticket_types
    }

    pub fn into_ticket_types(self) -> Vec<TicketType> {
        self.ticket_types
    }

    pub fn get(&self, id: TicketTypeId) -> Option<&TicketType> {
        self.ticket_types.iter().find(|ticket| ticket.id == id)
    }

    pub fn len(&self) -> usize {
        self.ticket_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticket_types.is_empty()
    }

    /// Fresh identifier not used by any ticket in this catalog.
    pub fn issue_id(&self) -> TicketTypeId {
        loop {
            let id = TicketTypeId::generate();
            if self.get(id).is_none() {
                return id;
            }
        }
    }

    /// Insert a new ticket type or replace the one with the same id.
    ///
    /// The catalog is left untouched when the ticket is rejected.
    pub fn add_or_update(&mut self, ticket: TicketType) -> Result<(), CatalogError> {
        validate_fields(&ticket)?;

        if let Some(dependency) = ticket.dependency_ticket_id {
            if dependency != ticket.id && self.get(dependency).is_none() {
                return Err(CatalogError::UnknownDependency {
                    ticket: ticket.id,
                    dependency,
                });
            }
        }

        if let Some(chain) = self.cycle_through(&ticket) {
            return Err(CatalogError::CyclicDependency {
                ticket: ticket.id,
                chain,
            });
        }

        match self
            .ticket_types
            .iter_mut()
            .find(|existing| existing.id == ticket.id)
        {
            Some(existing) => *existing = ticket,
            None => self.ticket_types.push(ticket),
        }
        Ok(())
    }

    /// Remove a ticket type. Tickets depending on it keep the dangling reference and become
    /// unpurchasable until their dependency is edited.
    pub fn remove(&mut self, id: TicketTypeId) -> Option<TicketType> {
        let index = self.ticket_types.iter().position(|ticket| ticket.id == id)?;
        let removed = self.ticket_types.remove(index);

        let orphaned = self.dependents_of(id).len();
        if orphaned > 0 {
            warn!(
                event_id = %self.event_id,
                ticket = %id,
                orphaned,
                "removed ticket type still has dependents"
            );
        }
        Some(removed)
    }

    pub fn duplicate(&mut self, id: TicketTypeId) -> Result<TicketType, CatalogError> {
        self.duplicate_with_suffix(id, DEFAULT_COPY_SUFFIX)
    }

    /// Copy a ticket type under a new id. The copy never carries a dependency.
    pub fn duplicate_with_suffix(
        &mut self,
        id: TicketTypeId,
        suffix: &str,
    ) -> Result<TicketType, CatalogError> {
        let original = self.get(id).ok_or(CatalogError::UnknownTicket(id))?;

        let mut copy = original.clone();
        copy.id = self.issue_id();
        copy.name = format!("{}{}", original.name, suffix);
        copy.dependency_ticket_id = None;

        self.ticket_types.push(copy.clone());
        Ok(copy)
    }

    pub fn dependents_of(&self, id: TicketTypeId) -> Vec<&TicketType> {
        self.ticket_types
            .iter()
            .filter(|ticket| ticket.dependency_ticket_id == Some(id))
            .collect()
    }

    /// Whether `ticket`'s dependency is met by the ticket types already in the basket.
    /// A dependency on a ticket missing from the catalog can never be met.
    pub fn dependency_satisfied(
        &self,
        ticket: &TicketType,
        purchased: &BTreeSet<TicketTypeId>,
    ) -> bool {
        match ticket.dependency_ticket_id {
            None => true,
            Some(dependency) => self.get(dependency).is_some() && purchased.contains(&dependency),
        }
    }

    /// Reject dangling or cyclic dependencies before the catalog is persisted.
    pub fn integrity_check(&self) -> Result<(), CatalogError> {
        for ticket in &self.ticket_types {
            if let Some(dependency) = ticket.dependency_ticket_id {
                if self.get(dependency).is_none() {
                    return Err(CatalogError::UnknownDependency {
                        ticket: ticket.id,
                        dependency,
                    });
                }
            }

            if let Some(chain) = self.cycle_through(ticket) {
                return Err(CatalogError::CyclicDependency {
                    ticket: ticket.id,
                    chain,
                });
            }
        }
        Ok(())
    }

    fn reject_cycles(&self) -> Result<(), CatalogError> {
        match self
            .ticket_types
            .iter()
            .find_map(|ticket| self.cycle_through(ticket).map(|chain| (ticket.id, chain)))
        {
            Some((ticket, chain)) => Err(CatalogError::CyclicDependency { ticket, chain }),
            None => Ok(()),
        }
    }

    /// Follow the dependency chain from `ticket`, reading `ticket` itself in place of any
    /// stored version. Returns the chain when it leads back to `ticket`.
    fn cycle_through(&self, ticket: &TicketType) -> Option<Vec<TicketTypeId>> {
        let mut chain = vec![ticket.id];
        let mut next = ticket.dependency_ticket_id;

        while let Some(id) = next {
            chain.push(id);
            if id == ticket.id {
                return Some(chain);
            }
            if chain[..chain.len() - 1].contains(&id) {
                // loop elsewhere in the graph; reported when its own members are checked
                return None;
            }
            next = self.get(id).and_then(|step| step.dependency_ticket_id);
        }
        None
    }
}

/// Wire shape of a catalog before its rules are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCatalog {
    event_id: EventId,
    ticket_types: Vec<TicketType>,
}

impl TryFrom<StoredCatalog> for TicketCatalog {
    type Error = CatalogError;

    fn try_from(stored: StoredCatalog) -> Result<Self, Self::Error> {
        let catalog = Self::with_checked_fields(stored.event_id, stored.ticket_types)?;
        catalog.reject_cycles()?;
        Ok(catalog)
    }
}

fn validate_fields(ticket: &TicketType) -> Result<(), CatalogError> {
    let invalid = |field: &'static str, reason: &'static str| CatalogError::InvalidTicket {
        ticket: ticket.id,
        field,
        reason,
    };

    if ticket.name.trim().is_empty() {
        return Err(invalid("name", "must not be empty"));
    }
    if ticket.price_gbp < Decimal::ZERO {
        return Err(invalid("priceGBP", "must not be negative"));
    }
    if !whole_pence(ticket.price_gbp) {
        return Err(invalid("priceGBP", "must be a whole number of pence"));
    }
    if ticket.end_date < ticket.start_date {
        return Err(invalid("endDate", "must not be before startDate"));
    }
    if ticket.capacity == Some(0) {
        return Err(invalid("capacity", "must be greater than zero"));
    }
    if ticket.max_per_order == Some(0) {
        return Err(invalid("maxPerOrder", "must be greater than zero"));
    }
    if ticket.min_age.is_some_and(|age| age > MAX_MIN_AGE) {
        return Err(invalid("minAge", "must be between 0 and 100"));
    }
    Ok(())
}
