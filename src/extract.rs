use std::collections::HashMap;

use axum::{
    Json,
    extract::{FromRef, FromRequest, Query, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::Value;
use tracing::debug;

use formgate_core::{FormRequestError, Payload};

use crate::lifecycle::RequestGate;
use crate::request::FormRequest;
use crate::validate::SharedValidator;

/// Extractor that resolves a [`FormRequest`] before the handler runs.
///
/// Builds the payload from the JSON body (when the request carries a JSON
/// content type) merged with query-string pairs, then drives the full
/// lifecycle: authorize, prepare hook, validate, post hook. Handlers only
/// see requests that passed; denials and rule mismatches are converted to
/// responses by [`FormRequestError`].
///
/// The rule engine is pulled from application state via
/// `FromRef<S> for SharedValidator`.
pub struct Validated<R>(pub RequestGate<R, SharedValidator>);

impl<S, R> FromRequest<S> for Validated<R>
where
    R: FormRequest + Default + Send,
    S: Send + Sync,
    SharedValidator: FromRef<S>,
{
    type Rejection = FormRequestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let validator = SharedValidator::from_ref(state);

        let query: HashMap<String, String> = Query::try_from_uri(req.uri())
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        let mut payload = if has_json_body(&req) {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|rejection| FormRequestError::InvalidBody(rejection.body_text()))?;
            Payload::from_value(value)
        } else {
            Payload::new()
        };

        // Body fields take precedence over query-string pairs.
        for (key, value) in query {
            if payload.get(&key).is_none() {
                payload.insert(key, Value::String(value));
            }
        }

        debug!(fields = payload.len(), "Resolving form request");

        let mut gate = RequestGate::new(R::default(), validator, payload);
        gate.validate_resolved()?;

        Ok(Validated(gate))
    }
}

fn has_json_body(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("json"))
}
