//! # Formgate
//!
//! Form-request authorization and validation lifecycle for Axum services.
//!
//! A form request bundles three things a handler should never have to
//! re-check: an authorization decision, a set of declared validation rule
//! paths, and optional hooks that mutate the payload before or after
//! validation. Formgate runs that pipeline during request extraction and
//! hands the handler the validated subset of the input.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── request.rs        # FormRequest trait: rules, authorize, hooks
//! ├── validate.rs       # RuleValidator capability (the rule-engine seam)
//! ├── lifecycle.rs      # RequestGate: at-most-once validation + projection
//! └── extract.rs        # Validated<R>: axum FromRequest integration
//! ```
//!
//! Rule evaluation itself is not implemented here. A [`RuleValidator`] is
//! handed the declared rule paths and the payload, and reports back either
//! the subset of paths it confirmed or a [`FieldErrors`] set. The
//! [`RequestGate`] then projects the payload down to the confirmed paths
//! using [`formgate_core::project`].
//!
//! ## Lifecycle
//!
//! 1. `authorize()` — denial fails the request with HTTP 403 and the fixed
//!    message "This action is unauthorized."
//! 2. `prepare_for_validation(&mut payload)` — optional pre-validation
//!    mutation.
//! 3. `RuleValidator::validate(rules, payload)` — rule mismatch fails the
//!    request with HTTP 422 carrying per-field errors and the failed input.
//! 4. The matched key set and its projection are recorded; validation never
//!    runs again for this request instance.
//! 5. `passed_validation(&mut payload)` — optional post-validation mutation;
//!    visible through `all()`, never through the recorded projection.
//!
//! ## Example
//!
//! ```ignore
//! use formgate::{FormRequest, RulePathSet, Validated};
//!
//! #[derive(Default)]
//! struct StoreComment;
//!
//! impl FormRequest for StoreComment {
//!     fn rules(&self) -> RulePathSet {
//!         RulePathSet::parse(["body", "tags.*"])
//!     }
//! }
//!
//! async fn store(Validated(request): Validated<StoreComment>) -> String {
//!     let data = request.safe();
//!     format!("validated {} fields", data.len())
//! }
//! ```

pub mod extract;
pub mod lifecycle;
pub mod request;
pub mod validate;

// Re-export the core crate and its commonly used types
pub use formgate_core;
pub use formgate_core::{FieldErrors, FormRequestError, Payload, RulePath, RulePathSet};

pub use extract::Validated;
pub use lifecycle::RequestGate;
pub use request::FormRequest;
pub use validate::{RuleValidator, SharedValidator};
