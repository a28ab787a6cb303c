use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPricingSettings, InMemorySales, InMemoryTicketCatalogs};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use event_pricing::config::AppConfig;
use event_pricing::error::AppError;
use event_pricing::pricing::PricingService;
use event_pricing::telemetry;
use event_pricing::tickets::TicketService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let pricing_service = Arc::new(PricingService::new(
        Arc::new(InMemoryPricingSettings::default()),
        &config.registration,
    ));
    let ticket_service = Arc::new(TicketService::new(
        Arc::new(InMemoryTicketCatalogs::default()),
        Arc::new(InMemorySales::default()),
        &config.registration,
    ));

    let app = with_api_routes(pricing_service, ticket_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "event pricing service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
