use crate::infra::{InMemoryPricingSettings, InMemorySales, InMemoryTicketCatalogs};
use chrono::{Duration, Local, Months, NaiveDate};
use clap::Args;
use event_pricing::config::{AppConfig, RegistrationConfig};
use event_pricing::error::AppError;
use event_pricing::event::EventId;
use event_pricing::pricing::{
    whole_months_between, ApplicationType, InstallmentCalculator, InstallmentPlan,
    InstallmentSchedule, PriceQuote, PricingService, PricingTier, ScheduleWarning, TierResolver,
    TierTable,
};
use event_pricing::tickets::{
    SaleRecord, TicketAvailabilityView, TicketService, TicketServiceError, TicketType,
    TicketTypeId,
};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// JSON file holding one tier table
    #[arg(long)]
    pub(crate) table: PathBuf,
    /// First day of the event (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) event_start: NaiveDate,
    /// Registration date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Installment plan length (3 or 6)
    #[arg(long, value_parser = parse_plan)]
    pub(crate) plan: Option<InstallmentPlan>,
    /// Print the quote as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Registration date used as "today" (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// First day of the sample event. Defaults to four months after `today`.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) event_start: Option<NaiveDate>,
    /// Skip the ticket availability portion of the demo.
    #[arg(long)]
    pub(crate) skip_tickets: bool,
}

fn parse_plan(raw: &str) -> Result<InstallmentPlan, String> {
    let payments = raw
        .trim()
        .parse::<u8>()
        .map_err(|err| format!("failed to parse '{raw}' as a payment count ({err})"))?;
    InstallmentPlan::try_from(payments).map_err(|err| err.to_string())
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        table,
        event_start,
        as_of,
        plan,
        json,
    } = args;

    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&table)?;
    let table: TierTable = serde_json::from_str(&raw)?;
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());

    let tier = TierResolver::new().resolve(&table, event_start, as_of)?;
    let schedule = plan
        .map(|plan| {
            InstallmentCalculator::new(config.registration.warn_below_full_price)
                .schedule(tier, plan)
        })
        .transpose()?;

    let quote = PriceQuote {
        application_type: table.application_type.clone(),
        event_start,
        as_of,
        lead_months: whole_months_between(as_of, event_start),
        tier: tier.clone(),
        schedule,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        render_quote(&quote);
    }
    Ok(())
}

fn render_quote(quote: &PriceQuote) {
    println!(
        "{} registration on {} for an event starting {} ({} month(s) ahead)",
        quote.application_type, quote.as_of, quote.event_start, quote.lead_months
    );
    println!(
        "  Tier: {} (from {} month(s) out), full price £{}",
        quote.tier.name, quote.tier.months_before_event, quote.tier.full_price
    );
    if let Some(schedule) = &quote.schedule {
        render_schedule(schedule);
    }
}

fn render_schedule(schedule: &InstallmentSchedule) {
    let payments = schedule
        .payments
        .iter()
        .map(|payment| format!("£{payment}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "  {}: total £{} paid as {}",
        schedule.plan, schedule.total, payments
    );
    for warning in &schedule.warnings {
        match warning {
            ScheduleWarning::TotalBelowFullPrice { total, full_price } => println!(
                "  Warning: installment total £{} is below the full price £{}",
                total, full_price
            ),
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let event_start = args
        .event_start
        .or_else(|| today.checked_add_months(Months::new(4)))
        .unwrap_or(today);
    let event_id = EventId::new("sample-convention");
    let registration = AppConfig::load()
        .map(|config| config.registration)
        .unwrap_or_default();

    println!("Event pricing demo");
    println!("  Event: {} starting {}", event_id, event_start);

    demo_pricing(&event_id, event_start, today, &registration)?;

    if args.skip_tickets {
        return Ok(());
    }
    demo_tickets(&event_id, event_start, today, &registration)
}

fn sample_tier_table() -> TierTable {
    TierTable::new(
        ApplicationType::new("artist"),
        vec![
            PricingTier::new("Late", 0, Decimal::new(200, 0)),
            PricingTier::new("Early", 3, Decimal::new(100, 0))
                .with_installments(InstallmentPlan::Three, Decimal::new(110, 0))
                .with_installments(InstallmentPlan::Six, Decimal::new(120, 0)),
            PricingTier::new("Regular", 1, Decimal::new(150, 0))
                .with_installments(InstallmentPlan::Three, Decimal::new(160, 0)),
        ],
    )
}

fn demo_pricing(
    event_id: &EventId,
    event_start: NaiveDate,
    today: NaiveDate,
    registration: &RegistrationConfig,
) -> Result<(), AppError> {
    let service = PricingService::new(Arc::new(InMemoryPricingSettings::default()), registration);
    let table = service.save_table(event_id, sample_tier_table())?;

    println!("\nTier table for {}", table.application_type);
    for tier in table.sorted_descending_by_lead_time() {
        let plans = [InstallmentPlan::Three, InstallmentPlan::Six]
            .into_iter()
            .filter_map(|plan| {
                tier.installment_total(plan)
                    .filter(|_| tier.installment_enabled(plan))
                    .map(|total| format!("{} £{}", plan, total))
            })
            .collect::<Vec<_>>();
        println!(
            "  {:<8} {:>2}+ month(s)  £{:<7} {}",
            tier.name,
            tier.months_before_event,
            tier.full_price,
            if plans.is_empty() {
                "pay in full only".to_string()
            } else {
                plans.join(", ")
            }
        );
    }

    println!("\nQuotes by registration date");
    let mut dates = vec![today];
    for months in [2, 1] {
        if let Some(date) = event_start.checked_sub_months(Months::new(months)) {
            dates.push(date);
        }
    }
    dates.push(event_start - Duration::days(10));
    dates.push(event_start);
    dates.sort();
    dates.dedup();

    for as_of in dates {
        match service.quote(
            event_id,
            &table.application_type,
            event_start,
            as_of,
            Some(InstallmentPlan::Three),
        ) {
            Ok(quote) => render_quote(&quote),
            Err(err) => {
                // Installments are not offered on every tier; fall back to paying in full.
                match service.quote(event_id, &table.application_type, event_start, as_of, None) {
                    Ok(quote) => {
                        render_quote(&quote);
                        println!("  {}", err);
                    }
                    Err(err) => println!("{}: quote unavailable: {}", as_of, err),
                }
            }
        }
    }
    Ok(())
}

fn demo_tickets(
    event_id: &EventId,
    event_start: NaiveDate,
    today: NaiveDate,
    registration: &RegistrationConfig,
) -> Result<(), AppError> {
    let sales = Arc::new(InMemorySales::default());
    let service = TicketService::new(
        Arc::new(InMemoryTicketCatalogs::default()),
        sales.clone(),
        registration,
    );

    let event_end = event_start + Duration::days(1);
    let sale_opens = today.min(event_start);

    let mut weekend = TicketType::new(
        TicketTypeId(Uuid::new_v4()),
        "Weekend Pass",
        Decimal::new(4500, 2),
        sale_opens,
        event_end,
    );
    weekend.capacity = Some(50);
    weekend.affects_venue_capacity = true;
    weekend.max_per_order = Some(4);

    let mut afterparty = TicketType::new(
        TicketTypeId(Uuid::new_v4()),
        "Saturday Afterparty",
        Decimal::new(1500, 2),
        sale_opens,
        event_start,
    );
    afterparty.capacity = Some(20);
    afterparty.applicable_days = BTreeSet::from([event_start]);
    afterparty.dependency_ticket_id = Some(weekend.id);
    afterparty.min_age = Some(18);

    let catalog = service.save_catalog(event_id, vec![weekend.clone(), afterparty.clone()])?;
    println!("\nTicket catalog ({} ticket types)", catalog.len());
    for ticket in catalog.ticket_types() {
        println!(
            "  {} £{} on sale {} to {}",
            ticket.name, ticket.price_gbp, ticket.start_date, ticket.end_date
        );
    }

    sales
        .record(
            event_id,
            SaleRecord {
                ticket_type_id: weekend.id,
                quantity_sold: 48,
                date: sale_opens,
            },
        )
        .map_err(TicketServiceError::from)?;
    println!("  Recorded 48 weekend passes sold");

    println!("\nAvailability on {}", event_start);
    let nothing_held = BTreeSet::new();
    let holding_pass = BTreeSet::from([weekend.id]);
    let checks = [
        (&weekend, &nothing_held, "weekend pass"),
        (&afterparty, &nothing_held, "afterparty without a pass"),
        (&afterparty, &holding_pass, "afterparty with a pass"),
    ];
    for (ticket, purchased, label) in checks {
        let view = service.availability(event_id, ticket.id, event_start, purchased)?;
        render_availability(label, &view);
    }

    let view = service.availability(event_id, afterparty.id, event_end, &holding_pass)?;
    render_availability(&format!("afterparty on {}", event_end), &view);

    let copy = service.duplicate_ticket(event_id, weekend.id)?;
    println!("\nDuplicated {} as {:?} ({})", weekend.name, copy.name, copy.id);
    Ok(())
}

fn render_availability(label: &str, view: &TicketAvailabilityView) {
    match view.availability.reason {
        Some(reason) => println!("  {:<32} unavailable: {}", label, reason.label()),
        None => println!(
            "  {:<32} {} remaining, up to {} per order",
            label, view.availability.remaining, view.orderable_quantity
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plan_accepts_three_and_six_payments() {
        assert_eq!(parse_plan("3"), Ok(InstallmentPlan::Three));
        assert_eq!(parse_plan(" 6 "), Ok(InstallmentPlan::Six));
        assert!(parse_plan("12").is_err());
        assert!(parse_plan("six").is_err());
    }

    #[test]
    fn sample_tier_table_is_valid() {
        let table = sample_tier_table();
        table.validate().expect("sample table validates");
        let order = table
            .sorted_descending_by_lead_time()
            .into_iter()
            .map(|tier| tier.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, ["Early", "Regular", "Late"]);
    }

    #[test]
    fn demo_runs_for_a_fixed_date() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date");
        let args = DemoArgs {
            today: Some(today),
            event_start: None,
            skip_tickets: false,
        };
        run_demo(args).expect("demo completes");
    }
}
