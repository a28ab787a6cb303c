use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a ticket type within an event's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketTypeId(pub Uuid);

impl TicketTypeId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TicketTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A purchasable inventory unit with its own capacity, sale window, and purchase constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub id: TicketTypeId,
    pub name: String,
    #[serde(rename = "priceGBP")]
    pub price_gbp: Decimal,
    /// `None` means unlimited.
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub affects_venue_capacity: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Empty means valid on every event day.
    #[serde(default)]
    pub applicable_days: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub dependency_ticket_id: Option<TicketTypeId>,
    #[serde(default)]
    pub max_per_order: Option<u32>,
    #[serde(default)]
    pub min_age: Option<u8>,
}

fn default_active() -> bool {
    true
}

impl TicketType {
    /// Active, unlimited ticket sold between `start_date` and `end_date`.
    pub fn new(
        id: TicketTypeId,
        name: impl Into<String>,
        price_gbp: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price_gbp,
            capacity: None,
            affects_venue_capacity: false,
            start_date,
            end_date,
            is_active: true,
            applicable_days: BTreeSet::new(),
            dependency_ticket_id: None,
            max_per_order: None,
            min_age: None,
        }
    }

    pub fn on_sale(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn is_day_scoped(&self) -> bool {
        !self.applicable_days.is_empty()
    }

    pub fn valid_on(&self, date: NaiveDate) -> bool {
        !self.is_day_scoped() || self.applicable_days.contains(&date)
    }
}

/// Quantity sold for a ticket type on a given date, as reported by the order system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub ticket_type_id: TicketTypeId,
    pub quantity_sold: u32,
    pub date: NaiveDate,
}

/// Remaining inventory for a ticket type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remaining {
    Limited(u32),
    Unlimited,
}

impl Remaining {
    pub const NONE: Remaining = Remaining::Limited(0);

    pub fn is_exhausted(self) -> bool {
        self == Remaining::NONE
    }

    /// Smaller of the two quantities; `Unlimited` only when both are.
    pub fn min(self, other: Remaining) -> Remaining {
        match (self, other) {
            (Remaining::Unlimited, other) | (other, Remaining::Unlimited) => other,
            (Remaining::Limited(a), Remaining::Limited(b)) => Remaining::Limited(a.min(b)),
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Limited(count) => write!(f, "{count}"),
            Remaining::Unlimited => write!(f, "unlimited"),
        }
    }
}
