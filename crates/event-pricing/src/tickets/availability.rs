use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Remaining, SaleRecord, TicketType};

/// Why a ticket type cannot be bought right now. Listed in evaluation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    Inactive,
    OutsideSaleWindow,
    DayNotApplicable,
    DependencyUnmet,
    SoldOut,
}

impl DenialReason {
    pub const fn label(self) -> &'static str {
        match self {
            DenialReason::Inactive => "ticket type is not on sale",
            DenialReason::OutsideSaleWindow => "outside the sale window",
            DenialReason::DayNotApplicable => "not valid on the requested day",
            DenialReason::DependencyUnmet => "requires another ticket to be purchased first",
            DenialReason::SoldOut => "sold out",
        }
    }
}

/// Result of an availability check. Denied checks always report zero remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub purchasable: bool,
    pub remaining: Remaining,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
}

impl Availability {
    fn denied(reason: DenialReason) -> Self {
        Self {
            purchasable: false,
            remaining: Remaining::NONE,
            reason: Some(reason),
        }
    }

    fn open(remaining: Remaining) -> Self {
        Self {
            purchasable: true,
            remaining,
            reason: None,
        }
    }

    /// Largest quantity a single order may contain, honouring `max_per_order`.
    pub fn orderable_quantity(&self, ticket: &TicketType) -> Remaining {
        if !self.purchasable {
            return Remaining::NONE;
        }
        match ticket.max_per_order {
            Some(limit) => self.remaining.min(Remaining::Limited(limit)),
            None => self.remaining,
        }
    }
}

/// Sold quantity that counts against `ticket`'s capacity on `date`.
///
/// Day-scoped tickets have a separate allocation per applicable day, so only sales recorded
/// for `date` are counted; other tickets count every sale.
pub fn quantity_sold(ticket: &TicketType, date: NaiveDate, sales: &[SaleRecord]) -> u32 {
    sales
        .iter()
        .filter(|sale| sale.ticket_type_id == ticket.id)
        .filter(|sale| !ticket.is_day_scoped() || sale.date == date)
        .fold(0u32, |total, sale| total.saturating_add(sale.quantity_sold))
}

/// Stateless evaluator deciding whether a ticket type can be bought on a date.
#[derive(Debug, Default, Clone, Copy)]
pub struct AvailabilityEngine;

impl AvailabilityEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn is_purchasable(
        &self,
        ticket: &TicketType,
        date: NaiveDate,
        sales: &[SaleRecord],
        dependency_satisfied: bool,
    ) -> Availability {
        if !ticket.is_active {
            return Availability::denied(DenialReason::Inactive);
        }
        if !ticket.on_sale(date) {
            return Availability::denied(DenialReason::OutsideSaleWindow);
        }
        if !ticket.valid_on(date) {
            return Availability::denied(DenialReason::DayNotApplicable);
        }
        if ticket.dependency_ticket_id.is_some() && !dependency_satisfied {
            return Availability::denied(DenialReason::DependencyUnmet);
        }

        match ticket.capacity {
            None => Availability::open(Remaining::Unlimited),
            Some(capacity) => {
                let sold = quantity_sold(ticket, date, sales);
                if sold >= capacity {
                    Availability::denied(DenialReason::SoldOut)
                } else {
                    Availability::open(Remaining::Limited(capacity - sold))
                }
            }
        }
    }
}
