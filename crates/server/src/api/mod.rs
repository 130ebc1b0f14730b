//! API layer - HTTP entry points.

pub mod admin;
pub mod dto;
pub mod portal;
pub mod public;
pub mod session;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use pharmstock_domain::DomainError;
use serde::Serialize;

use crate::app::App;
use crate::infrastructure::ports::{DrugLookupError, RepoError};
use crate::use_cases::auth::AuthError;
use crate::use_cases::catalog::CatalogError;
use crate::use_cases::inventory::InventoryError;
use crate::use_cases::listing::ListingError;
use crate::use_cases::pharmacy::PharmacyError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .merge(public::routes())
        .merge(admin::routes())
        .merge(portal::routes())
}

/// Uniform JSON envelope for every response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: "OK".into(),
            data: Some(data),
        })
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
        })
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
            }
            Self::Upstream(msg) => {
                tracing::warn!(error = %msg, "Upstream service failure");
                (StatusCode::BAD_GATEWAY, "Upstream service failure".into())
            }
        };
        let body = Json(ApiResponse::<()> {
            success: false,
            message,
            data: None,
        });
        (status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(_) | DomainError::Parse(_) => Self::BadRequest(e.to_string()),
            DomainError::NotFound { .. } => Self::NotFound(e.to_string()),
            DomainError::Duplicate(_) | DomainError::InvalidStateTransition(_) => {
                Self::Conflict(e.to_string())
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials
            | AuthError::InvalidSecurityKey
            | AuthError::AccountDisabled => Self::Unauthorized(e.to_string()),
            AuthError::InvalidToken => Self::BadRequest(e.to_string()),
            AuthError::Domain(d) => d.into(),
            AuthError::Repo(_) | AuthError::Password(_) | AuthError::Mail(_) => {
                Self::Internal(e.to_string())
            }
        }
    }
}

impl From<PharmacyError> for ApiError {
    fn from(e: PharmacyError) -> Self {
        match e {
            PharmacyError::Domain(d) => d.into(),
            PharmacyError::Repo(r) => r.into(),
            PharmacyError::Mail(m) => Self::Internal(m.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Domain(d) => d.into(),
            CatalogError::Repo(r) => r.into(),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::Domain(d) => d.into(),
            InventoryError::Repo(r) => r.into(),
            InventoryError::Forbidden => Self::Forbidden(e.to_string()),
        }
    }
}

impl From<ListingError> for ApiError {
    fn from(e: ListingError) -> Self {
        match e {
            ListingError::Repo(r) => r.into(),
        }
    }
}

impl From<DrugLookupError> for ApiError {
    fn from(e: DrugLookupError) -> Self {
        Self::Upstream(e.to_string())
    }
}
