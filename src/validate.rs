use std::sync::Arc;

use formgate_core::{FieldErrors, Payload, RulePathSet};

/// The narrow seam to an external rule engine.
///
/// Given the declared rule paths and the payload, the engine reports either
/// the subset of paths it confirmed against actual data (a declared path may
/// be absent from the result when the data it addresses does not exist), or
/// the per-field errors that failed the request.
pub trait RuleValidator {
    /// Evaluates the declared rules against the payload.
    fn validate(&self, rules: &RulePathSet, payload: &Payload) -> Result<RulePathSet, FieldErrors>;
}

/// A rule engine shared across requests, typically held in axum state.
pub type SharedValidator = Arc<dyn RuleValidator + Send + Sync>;

impl RuleValidator for SharedValidator {
    fn validate(
        &self,
        rules: &RulePathSet,
        payload: &Payload,
    ) -> Result<RulePathSet, FieldErrors> {
        (**self).validate(rules, payload)
    }
}
