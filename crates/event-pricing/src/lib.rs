//! Registration pricing and ticket inventory rules for event registration.
//!
//! The crate is split into two workflows: [`pricing`] resolves lead-time tiers and installment
//! schedules, [`tickets`] validates ticket catalogs and answers availability questions against a
//! sales snapshot. Persistence is expressed through repository traits so callers can plug in
//! their own storage.

pub mod config;
pub mod error;
pub mod event;
pub mod pricing;
pub mod store;
pub mod telemetry;
pub mod tickets;
