//! Lead-time pricing tiers and installment schedules for registration fees.

pub mod domain;
pub mod installments;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;
pub mod table;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationType, InstallmentPlan, PricingTier, TierTable, UnsupportedPlan};
pub use installments::{InstallmentCalculator, InstallmentSchedule, ScheduleWarning};
pub use repository::PricingSettingsRepository;
pub use resolver::{whole_months_between, ResolutionError, TierResolver};
pub use router::pricing_router;
pub use service::{PriceQuote, PricingService, PricingServiceError};
pub use table::{TierProblem, TierTableError};
