//! Request lifecycle gate.
//!
//! One [`RequestGate`] owns one in-flight request's payload and validation
//! state. The state machine has a single one-way transition: `NotStarted` to
//! `Validated`. Validation runs at most once per gate no matter how many
//! times validated data is requested.

use formgate_core::{FormRequestError, Payload, RulePathSet, project};
use tracing::debug;

use crate::request::FormRequest;
use crate::validate::RuleValidator;

enum ValidationState {
    NotStarted,
    Validated {
        matched: RulePathSet,
        projected: Payload,
    },
}

/// Drives a [`FormRequest`] through authorize, hooks, validation, and
/// projection, caching the result.
pub struct RequestGate<R, V> {
    request: R,
    validator: V,
    payload: Payload,
    state: ValidationState,
}

impl<R, V> RequestGate<R, V>
where
    R: FormRequest,
    V: RuleValidator,
{
    /// Creates a gate for one request instance. The payload is owned
    /// exclusively by this gate for the rest of its lifecycle.
    pub fn new(request: R, validator: V, payload: Payload) -> Self {
        Self {
            request,
            validator,
            payload,
            state: ValidationState::NotStarted,
        }
    }

    /// Runs the validation pipeline if it has not run yet.
    ///
    /// Order: authorize, prepare hook, validate, record matched keys and
    /// projection, post hook. Authorization denial skips validation
    /// entirely; a validation failure skips the post hook. Calling this
    /// again after a successful run is a no-op.
    ///
    /// # Errors
    ///
    /// [`FormRequestError::Unauthorized`] when the request definition denies
    /// access; [`FormRequestError::Validation`] when the validator reports
    /// unmatched rules, carrying the field errors and the prepare-mutated
    /// input.
    pub fn validate_resolved(&mut self) -> Result<(), FormRequestError> {
        if let ValidationState::Validated { .. } = self.state {
            debug!("Request already validated, skipping");
            return Ok(());
        }

        if !self.request.authorize() {
            debug!("Request authorization denied");
            return Err(FormRequestError::Unauthorized);
        }

        self.request.prepare_for_validation(&mut self.payload);

        let rules = self.request.rules();
        match self.validator.validate(&rules, &self.payload) {
            Ok(matched) => {
                // Project before the post hook so later payload mutation
                // cannot alter the recorded validated data.
                let projected = project::project(&self.payload, &matched);
                debug!(
                    rules = rules.len(),
                    matched = matched.len(),
                    "Request validated"
                );
                self.state = ValidationState::Validated { matched, projected };
                self.request.passed_validation(&mut self.payload);
                Ok(())
            }
            Err(errors) => {
                debug!(fields = errors.len(), "Request validation failed");
                Err(FormRequestError::Validation {
                    errors,
                    input: self.payload.clone(),
                })
            }
        }
    }

    /// The validated subset of the payload, validating first if needed.
    pub fn validated(&mut self) -> Result<Payload, FormRequestError> {
        self.validate_resolved()?;
        Ok(self.projection().cloned().unwrap_or_default())
    }

    /// The validated subset narrowed to the listed dotted keys.
    pub fn validated_only<I, S>(&mut self, keys: I) -> Result<Payload, FormRequestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.validate_resolved()?;
        match self.projection() {
            Some(projected) => Ok(project::only(projected, keys)),
            None => Ok(Payload::new()),
        }
    }

    /// The validated subset minus the listed dotted keys.
    pub fn validated_except<I, S>(&mut self, keys: I) -> Result<Payload, FormRequestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.validate_resolved()?;
        match self.projection() {
            Some(projected) => Ok(project::except(projected, keys)),
            None => Ok(Payload::new()),
        }
    }

    /// The validated subset without triggering validation: the cached
    /// projection when validation has succeeded, the empty payload
    /// otherwise.
    pub fn safe(&self) -> Payload {
        self.projection().cloned().unwrap_or_default()
    }

    /// The full current payload, including any hook mutations.
    pub fn all(&self) -> &Payload {
        &self.payload
    }

    /// The rule paths the validator confirmed, once validated.
    pub fn matched_keys(&self) -> Option<&RulePathSet> {
        match &self.state {
            ValidationState::Validated { matched, .. } => Some(matched),
            ValidationState::NotStarted => None,
        }
    }

    /// The request definition.
    pub fn request(&self) -> &R {
        &self.request
    }

    fn projection(&self) -> Option<&Payload> {
        match &self.state {
            ValidationState::Validated { projected, .. } => Some(projected),
            ValidationState::NotStarted => None,
        }
    }
}
