use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

/// A field-level validation error.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

/// Container for validation errors, used as the payload of `ApiError::Validation`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

impl ValidationErrorResponse {
    /// A response carrying a single field error.
    pub fn single(field: &str, message: &str, code: &str) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.to_string(),
                message: message.to_string(),
                code: code.to_string(),
            }],
        }
    }
}

/// Check a payload against its declared constraints, collecting every field
/// error rather than stopping at the first.
pub fn check<T>(value: &T) -> Result<(), ApiError>
where
    T: garde::Validate,
    T::Context: Default,
{
    value
        .validate()
        .map_err(|report| ApiError::Validation(convert_garde_report(&report)))
}

fn convert_garde_report(report: &garde::Report) -> ValidationErrorResponse {
    let mut field_errors = Vec::new();

    for (path, error) in report.iter() {
        let field = {
            let s = path.to_string();
            if s.is_empty() { "value".to_string() } else { s }
        };
        field_errors.push(FieldError {
            field,
            message: error.message().to_string(),
            code: "validation".to_string(),
        });
    }

    ValidationErrorResponse {
        errors: field_errors,
    }
}

/// An Axum extractor that deserializes JSON and validates it using `garde`.
///
/// Drop-in replacement for `Json<T>`. An unparsable body yields the generic
/// bad-request response; constraint failures yield the structured 400 with
/// one entry per offending field.
///
/// # Example
///
/// ```ignore
/// async fn create(Validated(body): Validated<UserPayload>) -> ... {
///     // body passed every declared rule
/// }
/// ```
pub struct Validated<T>(pub T);

impl<T, S> FromRequest<S> for Validated<T>
where
    T: DeserializeOwned + garde::Validate + 'static,
    T::Context: Default,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                tracing::debug!(detail = %rejection.body_text(), "rejected unparsable request body");
                ApiError::BadRequest("Invalid request body".into()).into_response()
            })?;

        check(&json.0).map_err(IntoResponse::into_response)?;

        Ok(Validated(json.0))
    }
}
