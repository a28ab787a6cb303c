use super::common::*;
use crate::pricing::domain::{ApplicationType, InstallmentPlan, PricingTier, TierTable};
use crate::pricing::repository::PricingSettingsRepository;
use crate::pricing::resolver::ResolutionError;
use crate::pricing::service::{PricingService, PricingServiceError};
use crate::pricing::table::TierTableError;
use crate::config::RegistrationConfig;
use crate::store::RepositoryError;
use rust_decimal::Decimal;
use std::sync::Arc;

#[test]
fn save_table_rejects_invalid_tables_before_persisting() {
    let (service, repository) = build_service(MemorySettings::default());
    let table = TierTable::new(artist(), vec![PricingTier::new("", 0, pounds(50))]);

    match service.save_table(&event_id(), table) {
        Err(PricingServiceError::Validation(TierTableError::InvalidTier { index: 0, .. })) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(repository.len(), 0);
}

#[test]
fn save_table_replaces_the_whole_table() {
    let (service, repository) = build_service(MemorySettings::seeded(standard_table()));
    let replacement = TierTable::new(artist(), vec![PricingTier::new("Flat", 0, pounds(175))]);

    service
        .save_table(&event_id(), replacement.clone())
        .expect("table saves");

    let stored = repository
        .get(&event_id(), &artist())
        .expect("fetch succeeds")
        .expect("table present");
    assert_eq!(stored, replacement);
}

#[test]
fn quote_includes_schedule_when_plan_requested() {
    let (service, _) = build_service(MemorySettings::seeded(standard_table()));

    let quote = service
        .quote(
            &event_id(),
            &artist(),
            event_start(),
            date(2026, 5, 12),
            Some(InstallmentPlan::Three),
        )
        .expect("quote resolves");

    assert_eq!(quote.tier.name, "Early");
    assert_eq!(quote.lead_months, 4);
    let schedule = quote.schedule.expect("schedule present");
    assert_eq!(
        schedule.payments,
        vec![
            Decimal::new(3667, 2),
            Decimal::new(3667, 2),
            Decimal::new(3666, 2)
        ]
    );
}

#[test]
fn quote_reports_unavailable_plan_instead_of_defaulting() {
    let (service, _) = build_service(MemorySettings::seeded(standard_table()));

    match service.quote(
        &event_id(),
        &artist(),
        event_start(),
        date(2026, 9, 1),
        Some(InstallmentPlan::Six),
    ) {
        Err(PricingServiceError::Resolution(ResolutionError::PlanUnavailable { tier, plan })) => {
            assert_eq!(tier, "Late");
            assert_eq!(plan, InstallmentPlan::Six);
        }
        other => panic!("expected unavailable plan, got {other:?}"),
    }
}

#[test]
fn quote_for_unknown_application_type_is_not_found() {
    let (service, _) = build_service(MemorySettings::seeded(standard_table()));

    match service.quote(
        &event_id(),
        &ApplicationType::new("caterer"),
        event_start(),
        date(2026, 5, 12),
        None,
    ) {
        Err(PricingServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn remove_table_deletes_settings() {
    let (service, repository) = build_service(MemorySettings::seeded(standard_table()));
    service
        .remove_table(&event_id(), &artist())
        .expect("table removed");
    assert_eq!(repository.len(), 0);
}

#[test]
fn repository_failures_propagate() {
    let service = PricingService::new(
        Arc::new(UnavailableSettings),
        &RegistrationConfig::default(),
    );

    match service.load_table(&event_id(), &artist()) {
        Err(PricingServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable repository, got {other:?}"),
    }
}
