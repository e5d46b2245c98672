use crate::catalog::CatalogImportError;
use crate::config::ConfigError;
use crate::orientation::{OrientationServiceError, SessionError, SessionStoreError};
use crate::telemetry::TelemetryError;
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
    Catalog(CatalogImportError),
    Orientation(OrientationServiceError),
    InvalidRequest(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::Orientation(err) => write!(f, "orientation error: {}", err),
            AppError::InvalidRequest(reason) => write!(f, "invalid request: {}", reason),
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
            AppError::Catalog(err) => Some(err),
            AppError::Orientation(err) => Some(err),
            AppError::InvalidRequest(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Orientation(err) => orientation_status(err),
            AppError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

fn orientation_status(err: &OrientationServiceError) -> StatusCode {
    match err {
        OrientationServiceError::Store(SessionStoreError::NotFound) => StatusCode::NOT_FOUND,
        OrientationServiceError::Store(SessionStoreError::Conflict)
        | OrientationServiceError::Store(SessionStoreError::Stale) => StatusCode::CONFLICT,
        OrientationServiceError::Store(SessionStoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        OrientationServiceError::Session(SessionError::QuizComplete)
        | OrientationServiceError::Session(SessionError::Incomplete { .. }) => {
            StatusCode::CONFLICT
        }
        OrientationServiceError::Session(SessionError::DimensionMismatch { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        OrientationServiceError::Session(SessionError::EmptyQuestionnaire) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
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

impl From<CatalogImportError> for AppError {
    fn from(value: CatalogImportError) -> Self {
        Self::Catalog(value)
    }
}

impl From<OrientationServiceError> for AppError {
    fn from(value: OrientationServiceError) -> Self {
        Self::Orientation(value)
    }
}
