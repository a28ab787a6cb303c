//! Ticket type catalogs and purchasability checks against a sales snapshot.

pub mod availability;
pub mod catalog;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use availability::{quantity_sold, Availability, AvailabilityEngine, DenialReason};
pub use catalog::{CatalogError, TicketCatalog, DEFAULT_COPY_SUFFIX};
pub use domain::{Remaining, SaleRecord, TicketType, TicketTypeId};
pub use repository::{SalesSnapshotSource, TicketCatalogRepository};
pub use router::ticket_router;
pub use service::{TicketAvailabilityView, TicketService, TicketServiceError};
