use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::event::EventId;
use crate::store::RepositoryError;

use super::catalog::CatalogError;
use super::domain::{TicketType, TicketTypeId};
use super::repository::{SalesSnapshotSource, TicketCatalogRepository};
use super::service::{TicketService, TicketServiceError};

/// Router builder exposing catalog maintenance and availability checks.
pub fn ticket_router<C, S>(service: Arc<TicketService<C, S>>) -> Router
where
    C: TicketCatalogRepository + 'static,
    S: SalesSnapshotSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/events/:event_id/tickets",
            get(list_handler::<C, S>).put(replace_handler::<C, S>),
        )
        .route(
            "/api/v1/events/:event_id/tickets/:ticket_id",
            put(upsert_handler::<C, S>).delete(remove_handler::<C, S>),
        )
        .route(
            "/api/v1/events/:event_id/tickets/:ticket_id/duplicate",
            post(duplicate_handler::<C, S>),
        )
        .route(
            "/api/v1/events/:event_id/tickets/:ticket_id/availability",
            post(availability_handler::<C, S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AvailabilityRequest {
    pub(crate) date: NaiveDate,
    #[serde(default)]
    pub(crate) purchased: BTreeSet<TicketTypeId>,
}

pub(crate) async fn list_handler<C, S>(
    State(service): State<Arc<TicketService<C, S>>>,
    Path(event_id): Path<String>,
) -> Response
where
    C: TicketCatalogRepository + 'static,
    S: SalesSnapshotSource + 'static,
{
    match service.load_catalog(&EventId(event_id)) {
        Ok(catalog) => (StatusCode::OK, axum::Json(catalog.into_ticket_types())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn replace_handler<C, S>(
    State(service): State<Arc<TicketService<C, S>>>,
    Path(event_id): Path<String>,
    axum::Json(ticket_types): axum::Json<Vec<TicketType>>,
) -> Response
where
    C: TicketCatalogRepository + 'static,
    S: SalesSnapshotSource + 'static,
{
    match service.save_catalog(&EventId(event_id), ticket_types) {
        Ok(catalog) => (StatusCode::OK, axum::Json(catalog.into_ticket_types())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn upsert_handler<C, S>(
    State(service): State<Arc<TicketService<C, S>>>,
    Path((event_id, ticket_id)): Path<(String, Uuid)>,
    axum::Json(ticket): axum::Json<TicketType>,
) -> Response
where
    C: TicketCatalogRepository + 'static,
    S: SalesSnapshotSource + 'static,
{
    if ticket.id != TicketTypeId(ticket_id) {
        let payload = json!({
            "error": format!("ticket {} was submitted for {}", ticket.id, ticket_id),
            "field": "id",
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match service.upsert_ticket(&EventId(event_id), ticket) {
        Ok(ticket) => (StatusCode::OK, axum::Json(ticket)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn remove_handler<C, S>(
    State(service): State<Arc<TicketService<C, S>>>,
    Path((event_id, ticket_id)): Path<(String, Uuid)>,
) -> Response
where
    C: TicketCatalogRepository + 'static,
    S: SalesSnapshotSource + 'static,
{
    match service.remove_ticket(&EventId(event_id), TicketTypeId(ticket_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn duplicate_handler<C, S>(
    State(service): State<Arc<TicketService<C, S>>>,
    Path((event_id, ticket_id)): Path<(String, Uuid)>,
) -> Response
where
    C: TicketCatalogRepository + 'static,
    S: SalesSnapshotSource + 'static,
{
    match service.duplicate_ticket(&EventId(event_id), TicketTypeId(ticket_id)) {
        Ok(copy) => (StatusCode::CREATED, axum::Json(copy)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn availability_handler<C, S>(
    State(service): State<Arc<TicketService<C, S>>>,
    Path((event_id, ticket_id)): Path<(String, Uuid)>,
    axum::Json(request): axum::Json<AvailabilityRequest>,
) -> Response
where
    C: TicketCatalogRepository + 'static,
    S: SalesSnapshotSource + 'static,
{
    match service.availability(
        &EventId(event_id),
        TicketTypeId(ticket_id),
        request.date,
        &request.purchased,
    ) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: TicketServiceError) -> Response {
    let (status, payload) = match &err {
        TicketServiceError::Catalog(CatalogError::InvalidTicket { field, .. }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": err.to_string(), "field": field }),
        ),
        TicketServiceError::Catalog(CatalogError::UnknownTicket(_)) => {
            (StatusCode::NOT_FOUND, json!({ "error": err.to_string() }))
        }
        TicketServiceError::Catalog(CatalogError::CyclicDependency { chain, .. }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": err.to_string(),
                "field": "dependencyTicketId",
                "chain": chain,
            }),
        ),
        TicketServiceError::Catalog(
            CatalogError::UnknownDependency { .. } | CatalogError::DuplicateTicket(_),
        ) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": err.to_string() }),
        ),
        TicketServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, json!({ "error": err.to_string() }))
        }
        TicketServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, json!({ "error": err.to_string() }))
        }
        TicketServiceError::Repository(RepositoryError::Unavailable(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": err.to_string() }),
        ),
    };
    (status, axum::Json(payload)).into_response()
}
