use crate::config::ConfigError;
use crate::pricing::{PricingServiceError, ResolutionError, TierTableError};
use crate::store::RepositoryError;
use crate::telemetry::TelemetryError;
use crate::tickets::{CatalogError, TicketServiceError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Input(serde_json::Error),
    Pricing(PricingServiceError),
    Tickets(TicketServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Input(err) => write!(f, "malformed input: {}", err),
            AppError::Pricing(err) => write!(f, "pricing error: {}", err),
            AppError::Tickets(err) => write!(f, "ticket error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Input(err) => Some(err),
            AppError::Pricing(err) => Some(err),
            AppError::Tickets(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Input(_)
            | AppError::Pricing(PricingServiceError::Validation(_))
            | AppError::Tickets(TicketServiceError::Catalog(
                CatalogError::InvalidTicket { .. }
                | CatalogError::UnknownDependency { .. }
                | CatalogError::CyclicDependency { .. }
                | CatalogError::DuplicateTicket(_),
            )) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Pricing(PricingServiceError::Resolution(_)) => StatusCode::CONFLICT,
            AppError::Pricing(PricingServiceError::Repository(RepositoryError::NotFound))
            | AppError::Tickets(TicketServiceError::Repository(RepositoryError::NotFound))
            | AppError::Tickets(TicketServiceError::Catalog(CatalogError::UnknownTicket(_))) => {
                StatusCode::NOT_FOUND
            }
            AppError::Pricing(PricingServiceError::Repository(_))
            | AppError::Tickets(TicketServiceError::Repository(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Input(value)
    }
}

impl From<PricingServiceError> for AppError {
    fn from(value: PricingServiceError) -> Self {
        Self::Pricing(value)
    }
}

impl From<TierTableError> for AppError {
    fn from(value: TierTableError) -> Self {
        Self::Pricing(PricingServiceError::Validation(value))
    }
}

impl From<ResolutionError> for AppError {
    fn from(value: ResolutionError) -> Self {
        Self::Pricing(PricingServiceError::Resolution(value))
    }
}

impl From<TicketServiceError> for AppError {
    fn from(value: TicketServiceError) -> Self {
        Self::Tickets(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Tickets(TicketServiceError::Catalog(value))
    }
}
