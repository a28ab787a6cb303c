use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use event_pricing::pricing::{pricing_router, PricingService, PricingSettingsRepository};
use event_pricing::tickets::{
    ticket_router, SalesSnapshotSource, TicketCatalogRepository, TicketService,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_api_routes<R, C, S>(
    pricing: Arc<PricingService<R>>,
    tickets: Arc<TicketService<C, S>>,
) -> axum::Router
where
    R: PricingSettingsRepository + 'static,
    C: TicketCatalogRepository + 'static,
    S: SalesSnapshotSource + 'static,
{
    pricing_router(pricing)
        .merge(ticket_router(tickets))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
