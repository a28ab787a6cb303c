use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::config::RegistrationConfig;
use crate::event::EventId;
use crate::pricing::domain::{ApplicationType, InstallmentPlan, PricingTier, TierTable};
use crate::pricing::repository::PricingSettingsRepository;
use crate::pricing::service::PricingService;
use crate::store::RepositoryError;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn pounds(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

pub(super) fn event_id() -> EventId {
    EventId::new("ink-fest-2026")
}

pub(super) fn artist() -> ApplicationType {
    ApplicationType::new("artist")
}

pub(super) fn event_start() -> NaiveDate {
    date(2026, 9, 12)
}

/// Early (3 months) £100, Regular (1 month) £150, Late (0 months) £200.
pub(super) fn standard_table() -> TierTable {
    TierTable::new(
        artist(),
        vec![
            PricingTier::new("Early", 3, pounds(100))
                .with_installments(InstallmentPlan::Three, pounds(110))
                .with_installments(InstallmentPlan::Six, pounds(120)),
            PricingTier::new("Regular", 1, pounds(150))
                .with_installments(InstallmentPlan::Three, pounds(160)),
            PricingTier::new("Late", 0, pounds(200)),
        ],
    )
}

pub(super) fn table_without_late_tier() -> TierTable {
    let mut table = standard_table();
    table.tiers.retain(|tier| tier.months_before_event > 0);
    table
}

#[derive(Default, Clone)]
pub(super) struct MemorySettings {
    pub(super) tables: Arc<Mutex<HashMap<(EventId, ApplicationType), TierTable>>>,
}

impl MemorySettings {
    pub(super) fn seeded(table: TierTable) -> Self {
        let settings = Self::default();
        settings
            .tables
            .lock()
            .expect("settings mutex poisoned")
            .insert((event_id(), table.application_type.clone()), table);
        settings
    }

    pub(super) fn len(&self) -> usize {
        self.tables.lock().expect("settings mutex poisoned").len()
    }
}

impl PricingSettingsRepository for MemorySettings {
    fn get(
        &self,
        event_id: &EventId,
        application_type: &ApplicationType,
    ) -> Result<Option<TierTable>, RepositoryError> {
        let guard = self.tables.lock().expect("settings mutex poisoned");
        Ok(guard
            .get(&(event_id.clone(), application_type.clone()))
            .cloned())
    }

    fn put(&self, event_id: &EventId, table: TierTable) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("settings mutex poisoned");
        guard.insert((event_id.clone(), table.application_type.clone()), table);
        Ok(())
    }

    fn delete(
        &self,
        event_id: &EventId,
        application_type: &ApplicationType,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("settings mutex poisoned");
        guard.remove(&(event_id.clone(), application_type.clone()));
        Ok(())
    }
}

pub(super) struct UnavailableSettings;

impl PricingSettingsRepository for UnavailableSettings {
    fn get(
        &self,
        _event_id: &EventId,
        _application_type: &ApplicationType,
    ) -> Result<Option<TierTable>, RepositoryError> {
        Err(RepositoryError::Unavailable("settings store offline".to_string()))
    }

    fn put(&self, _event_id: &EventId, _table: TierTable) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("settings store offline".to_string()))
    }

    fn delete(
        &self,
        _event_id: &EventId,
        _application_type: &ApplicationType,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("settings store offline".to_string()))
    }
}

pub(super) fn build_service(
    settings: MemorySettings,
) -> (PricingService<MemorySettings>, Arc<MemorySettings>) {
    let repository = Arc::new(settings);
    let service = PricingService::new(repository.clone(), &RegistrationConfig::default());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
