//! Response envelope, error mapping and request extractors shared by all
//! HTTP modules

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::shared::Upserted;

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`.
/// Failure: `{"success": false, "data": null, "error": "...", "field": "start"}`,
/// where `field` names the offending request field when there is one.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field: None,
        }
    }

    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::error(message)
        }
    }
}

pub const AUTHENTICATE_REALM: &str = "Basic realm=\"Restricted Access\"";

/// Domain error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub error: DomainError,
    /// Request field to blame, when the domain error does not carry one
    pub field: Option<&'static str>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self { error, field: None }
    }
}

impl ApiError {
    pub fn with_field(error: DomainError, field: &'static str) -> Self {
        Self {
            error,
            field: Some(field),
        }
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            DomainError::Slot(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Ownership { .. } | DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::UniqueViolation(_) => StatusCode::CONFLICT,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.error {
            DomainError::Slot(violation) => match self.field.or(violation.field()) {
                Some(field) => ApiResponse::<()>::field_error(field, violation.to_string()),
                None => ApiResponse::error(violation.to_string()),
            },
            DomainError::Storage(detail) => {
                error!(error = %detail, "Storage failure while handling request");
                ApiResponse::error("Internal server error")
            }
            DomainError::Unauthorized(reason) => {
                tracing::debug!(reason = %reason, "Rejected credentials");
                ApiResponse::error("You are not authorized")
            }
            other => match self.field {
                Some(field) => ApiResponse::field_error(field, other.to_string()),
                None => ApiResponse::error(other.to_string()),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(AUTHENTICATE_REALM),
            );
        }
        response
    }
}

/// 201 for a record created by PUT, 200 for a replaced one
pub fn upsert_status<T>(outcome: &Upserted<T>) -> StatusCode {
    if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}
