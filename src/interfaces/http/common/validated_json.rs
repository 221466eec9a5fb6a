//! JSON body extractor with `validator` rules
//!
//! Malformed JSON and missing or mistyped fields are rejected with 400,
//! rule violations with 422. Both use the standard envelope; when exactly
//! one field is at fault it is named in `field`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

/// `Json<T>` that also runs `T::validate()`.
///
/// ```ignore
/// async fn create(ValidatedJson(body): ValidatedJson<AddressRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Rejected request body, already rendered into the envelope
#[derive(Debug)]
pub struct BodyRejection {
    status: StatusCode,
    body: ApiResponse<()>,
}

impl From<JsonRejection> for BodyRejection {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        let status = match rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            body: ApiResponse::error(format!("Invalid JSON data: {}", rejection.body_text())),
        }
    }
}

impl From<ValidationErrors> for BodyRejection {
    fn from(errors: ValidationErrors) -> Self {
        let (field, message) = summarize(&errors);
        let body = match field {
            Some(field) => ApiResponse::field_error(field, message),
            None => ApiResponse::error(message),
        };
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body,
        }
    }
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Sorted `field: message` list, plus the field name when only one failed
fn summarize(errors: &ValidationErrors) -> (Option<String>, String) {
    let by_field = errors.field_errors();

    let mut lines: Vec<String> = by_field
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    lines.sort();

    let field = match by_field.len() {
        1 => by_field.keys().next().map(|f| f.to_string()),
        _ => None,
    };
    let message = if lines.is_empty() {
        "Validation failed".to_string()
    } else {
        lines.join("; ")
    };
    (field, message)
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
