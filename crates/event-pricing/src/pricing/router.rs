use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use crate::event::EventId;
use crate::store::RepositoryError;

use super::domain::{ApplicationType, InstallmentPlan, TierTable};
use super::repository::PricingSettingsRepository;
use super::service::{PricingService, PricingServiceError};

/// Router builder exposing tier table maintenance and price quotes.
pub fn pricing_router<R>(service: Arc<PricingService<R>>) -> Router
where
    R: PricingSettingsRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/events/:event_id/pricing/:application_type",
            get(get_table_handler::<R>)
                .put(put_table_handler::<R>)
                .delete(delete_table_handler::<R>),
        )
        .route(
            "/api/v1/events/:event_id/pricing/:application_type/quote",
            get(quote_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteParams {
    pub(crate) event_start: NaiveDate,
    #[serde(default)]
    pub(crate) as_of: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) plan: Option<u8>,
}

pub(crate) async fn put_table_handler<R>(
    State(service): State<Arc<PricingService<R>>>,
    Path((event_id, application_type)): Path<(String, String)>,
    axum::Json(table): axum::Json<TierTable>,
) -> Response
where
    R: PricingSettingsRepository + 'static,
{
    if table.application_type.as_str() != application_type {
        let payload = json!({
            "error": format!(
                "table is for {} but was submitted for {}",
                table.application_type, application_type
            ),
            "field": "applicationType",
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match service.save_table(&EventId(event_id), table) {
        Ok(saved) => (StatusCode::OK, axum::Json(saved)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_table_handler<R>(
    State(service): State<Arc<PricingService<R>>>,
    Path((event_id, application_type)): Path<(String, String)>,
) -> Response
where
    R: PricingSettingsRepository + 'static,
{
    match service.load_table(&EventId(event_id), &ApplicationType(application_type)) {
        Ok(table) => (StatusCode::OK, axum::Json(table)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_table_handler<R>(
    State(service): State<Arc<PricingService<R>>>,
    Path((event_id, application_type)): Path<(String, String)>,
) -> Response
where
    R: PricingSettingsRepository + 'static,
{
    match service.remove_table(&EventId(event_id), &ApplicationType(application_type)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn quote_handler<R>(
    State(service): State<Arc<PricingService<R>>>,
    Path((event_id, application_type)): Path<(String, String)>,
    Query(params): Query<QuoteParams>,
) -> Response
where
    R: PricingSettingsRepository + 'static,
{
    let plan = match params.plan.map(InstallmentPlan::try_from).transpose() {
        Ok(plan) => plan,
        Err(err) => {
            let payload = json!({ "error": err.to_string(), "field": "plan" });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };
    let as_of = params.as_of.unwrap_or_else(|| Local::now().date_naive());

    match service.quote(
        &EventId(event_id),
        &ApplicationType(application_type),
        params.event_start,
        as_of,
        plan,
    ) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: PricingServiceError) -> Response {
    let (status, payload) = match &err {
        PricingServiceError::Validation(validation) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": err.to_string(), "field": validation.field() }),
        ),
        PricingServiceError::Resolution(_) => {
            (StatusCode::CONFLICT, json!({ "error": err.to_string() }))
        }
        PricingServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            json!({ "error": "no tier table configured" }),
        ),
        PricingServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, json!({ "error": err.to_string() }))
        }
        PricingServiceError::Repository(RepositoryError::Unavailable(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": err.to_string() }),
        ),
    };
    (status, axum::Json(payload)).into_response()
}
