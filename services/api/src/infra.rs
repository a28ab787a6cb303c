use chrono::NaiveDate;
use event_pricing::event::EventId;
use event_pricing::pricing::{ApplicationType, PricingSettingsRepository, TierTable};
use event_pricing::store::RepositoryError;
use event_pricing::tickets::{
    SaleRecord, SalesSnapshotSource, TicketCatalog, TicketCatalogRepository, TicketTypeId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPricingSettings {
    tables: Arc<Mutex<HashMap<(EventId, ApplicationType), TierTable>>>,
}

impl PricingSettingsRepository for InMemoryPricingSettings {
    fn get(
        &self,
        event_id: &EventId,
        application_type: &ApplicationType,
    ) -> Result<Option<TierTable>, RepositoryError> {
        let guard = lock(&self.tables)?;
        Ok(guard
            .get(&(event_id.clone(), application_type.clone()))
            .cloned())
    }

    fn put(&self, event_id: &EventId, table: TierTable) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.tables)?;
        guard.insert((event_id.clone(), table.application_type.clone()), table);
        Ok(())
    }

    fn delete(
        &self,
        event_id: &EventId,
        application_type: &ApplicationType,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.tables)?;
        guard.remove(&(event_id.clone(), application_type.clone()));
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTicketCatalogs {
    catalogs: Arc<Mutex<HashMap<EventId, TicketCatalog>>>,
}

impl TicketCatalogRepository for InMemoryTicketCatalogs {
    fn get(&self, event_id: &EventId) -> Result<Option<TicketCatalog>, RepositoryError> {
        let guard = lock(&self.catalogs)?;
        Ok(guard.get(event_id).cloned())
    }

    fn put(&self, catalog: TicketCatalog) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.catalogs)?;
        guard.insert(catalog.event_id().clone(), catalog);
        Ok(())
    }
}

/// Sales feed stand-in. The HTTP service starts with no sales; the demo records its own.
#[derive(Default, Clone)]
pub(crate) struct InMemorySales {
    records: Arc<Mutex<HashMap<EventId, Vec<SaleRecord>>>>,
}

impl InMemorySales {
    pub(crate) fn record(
        &self,
        event_id: &EventId,
        sale: SaleRecord,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        guard.entry(event_id.clone()).or_default().push(sale);
        Ok(())
    }
}

impl SalesSnapshotSource for InMemorySales {
    fn snapshot(
        &self,
        event_id: &EventId,
        ticket_type_id: Option<TicketTypeId>,
    ) -> Result<Vec<SaleRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .get(event_id)
            .map(|sales| {
                sales
                    .iter()
                    .filter(|sale| ticket_type_id.map_or(true, |id| sale.ticket_type_id == id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_pricing::pricing::PricingTier;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parse_date_accepts_padded_iso_dates() {
        assert_eq!(parse_date(" 2026-09-12 "), Ok(date(2026, 9, 12)));
        assert!(parse_date("12/09/2026").is_err());
    }

    #[test]
    fn pricing_tables_are_keyed_by_event_and_application_type() {
        let settings = InMemoryPricingSettings::default();
        let event = EventId::new("ink-fest-2026");
        let artist = ApplicationType::new("artist");
        let table = TierTable::new(
            artist.clone(),
            vec![PricingTier::new("Late", 0, Decimal::new(200, 0))],
        );

        settings.put(&event, table.clone()).expect("put");

        assert_eq!(settings.get(&event, &artist).expect("get"), Some(table));
        assert_eq!(
            settings
                .get(&EventId::new("other"), &artist)
                .expect("get other event"),
            None
        );
        settings.delete(&event, &artist).expect("delete");
        assert_eq!(settings.get(&event, &artist).expect("get after delete"), None);
        settings.delete(&event, &artist).expect("repeat delete is a no-op");
    }

    #[test]
    fn sales_snapshot_filters_by_ticket_type() {
        let sales = InMemorySales::default();
        let event = EventId::new("ink-fest-2026");
        let pass = TicketTypeId(Uuid::from_u128(1));
        let party = TicketTypeId(Uuid::from_u128(2));
        for (ticket_type_id, quantity_sold) in [(pass, 3), (party, 5), (pass, 2)] {
            sales
                .record(
                    &event,
                    SaleRecord {
                        ticket_type_id,
                        quantity_sold,
                        date: date(2026, 9, 12),
                    },
                )
                .expect("record sale");
        }

        assert_eq!(sales.snapshot(&event, None).expect("all").len(), 3);
        let filtered = sales.snapshot(&event, Some(pass)).expect("filtered");
        assert_eq!(filtered.iter().map(|s| s.quantity_sold).sum::<u32>(), 5);
        assert!(sales
            .snapshot(&EventId::new("other"), None)
            .expect("empty")
            .is_empty());
    }
}
