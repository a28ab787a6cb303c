use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::config::RegistrationConfig;
use crate::event::EventId;
use crate::store::RepositoryError;
use crate::tickets::catalog::TicketCatalog;
use crate::tickets::domain::{SaleRecord, TicketType, TicketTypeId};
use crate::tickets::repository::{SalesSnapshotSource, TicketCatalogRepository};
use crate::tickets::service::TicketService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn event_id() -> EventId {
    EventId::new("ink-fest-2026")
}

pub(super) fn ticket_id(n: u128) -> TicketTypeId {
    TicketTypeId(Uuid::from_u128(n))
}

/// Weekend pass on sale from June through the end of the event.
pub(super) fn weekend_pass() -> TicketType {
    let mut ticket = TicketType::new(
        ticket_id(1),
        "Weekend Pass",
        Decimal::new(4500, 2),
        date(2026, 6, 1),
        date(2026, 9, 13),
    );
    ticket.capacity = Some(50);
    ticket.affects_venue_capacity = true;
    ticket.max_per_order = Some(4);
    ticket
}

/// Saturday-only add-on requiring the weekend pass.
pub(super) fn afterparty() -> TicketType {
    let mut ticket = TicketType::new(
        ticket_id(2),
        "Saturday Afterparty",
        Decimal::new(1500, 2),
        date(2026, 6, 1),
        date(2026, 9, 13),
    );
    ticket.capacity = Some(20);
    ticket.applicable_days = [date(2026, 9, 12)].into_iter().collect();
    ticket.dependency_ticket_id = Some(ticket_id(1));
    ticket.min_age = Some(18);
    ticket
}

pub(super) fn catalog() -> TicketCatalog {
    TicketCatalog::from_ticket_types(event_id(), vec![weekend_pass(), afterparty()])
        .expect("catalog is valid")
}

pub(super) fn sale(ticket: TicketTypeId, quantity_sold: u32, on: NaiveDate) -> SaleRecord {
    SaleRecord {
        ticket_type_id: ticket,
        quantity_sold,
        date: on,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCatalogs {
    pub(super) catalogs: Arc<Mutex<HashMap<EventId, TicketCatalog>>>,
}

impl MemoryCatalogs {
    pub(super) fn seeded(catalog: TicketCatalog) -> Self {
        let repository = Self::default();
        repository
            .catalogs
            .lock()
            .expect("catalog mutex poisoned")
            .insert(catalog.event_id().clone(), catalog);
        repository
    }

    pub(super) fn stored(&self) -> Option<TicketCatalog> {
        self.catalogs
            .lock()
            .expect("catalog mutex poisoned")
            .get(&event_id())
            .cloned()
    }
}

impl TicketCatalogRepository for MemoryCatalogs {
    fn get(&self, event_id: &EventId) -> Result<Option<TicketCatalog>, RepositoryError> {
        let guard = self.catalogs.lock().expect("catalog mutex poisoned");
        Ok(guard.get(event_id).cloned())
    }

    fn put(&self, catalog: TicketCatalog) -> Result<(), RepositoryError> {
        let mut guard = self.catalogs.lock().expect("catalog mutex poisoned");
        guard.insert(catalog.event_id().clone(), catalog);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySales {
    records: Arc<Mutex<Vec<SaleRecord>>>,
}

impl MemorySales {
    pub(super) fn with(records: Vec<SaleRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl SalesSnapshotSource for MemorySales {
    fn snapshot(
        &self,
        _event_id: &EventId,
        ticket_type_id: Option<TicketTypeId>,
    ) -> Result<Vec<SaleRecord>, RepositoryError> {
        let guard = self.records.lock().expect("sales mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| ticket_type_id.map_or(true, |id| record.ticket_type_id == id))
            .cloned()
            .collect())
    }
}

pub(super) struct OfflineSales;

impl SalesSnapshotSource for OfflineSales {
    fn snapshot(
        &self,
        _event_id: &EventId,
        _ticket_type_id: Option<TicketTypeId>,
    ) -> Result<Vec<SaleRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("order system offline".to_string()))
    }
}

pub(super) fn build_service(
    catalogs: MemoryCatalogs,
    sales: MemorySales,
) -> (
    TicketService<MemoryCatalogs, MemorySales>,
    Arc<MemoryCatalogs>,
) {
    let catalogs = Arc::new(catalogs);
    let service = TicketService::new(
        catalogs.clone(),
        Arc::new(sales),
        &RegistrationConfig::default(),
    );
    (service, catalogs)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
