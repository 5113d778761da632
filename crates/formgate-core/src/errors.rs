use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::payload::Payload;

/// Per-field validation messages, keyed by the field's dotted path.
///
/// Ordering is deterministic (sorted by field) so error responses are stable
/// across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Appends a message to a field's error list.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Whether no field has errors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates fields and their messages in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

/// Failure raised while resolving a form request.
///
/// Both variants are terminal for the current request: there is no partial
/// success and no retry.
#[derive(Debug, thiserror::Error)]
pub enum FormRequestError {
    /// The request definition denied access.
    #[error("This action is unauthorized.")]
    Unauthorized,

    /// The validator reported unmatched rules. Carries the per-field errors
    /// and the input as it stood after the prepare hook, so callers can
    /// redisplay a form with prior values.
    #[error("The given data was invalid.")]
    Validation {
        /// Structured per-field messages from the validator.
        errors: FieldErrors,
        /// The payload that failed validation.
        input: Payload,
    },

    /// The request body could not be parsed into a payload.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl IntoResponse for FormRequestError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            FormRequestError::Unauthorized => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": message })),
            )
                .into_response(),
            FormRequestError::Validation { errors, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": message, "errors": errors })),
            )
                .into_response(),
            FormRequestError::InvalidBody(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message })),
            )
                .into_response(),
        }
    }
}
