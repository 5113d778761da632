//! # Formgate Core
//!
//! Foundational types for the Formgate request-validation library.
//!
//! This crate provides the pieces that do not depend on any web framework
//! beyond error-to-response conversion:
//!
//! - [`payload`]: the owned JSON-object buffer a request carries through its
//!   validation lifecycle
//! - [`path`]: the typed rule-path grammar (`nested.foo`, `array.*`,
//!   `nested.*.bar`)
//! - [`project`]: extraction of the rule-covered subset of a payload
//! - [`errors`]: authorization/validation failures with HTTP response
//!   conversion
//!
//! # Example
//!
//! ```
//! use formgate_core::path::RulePathSet;
//! use formgate_core::payload::Payload;
//! use formgate_core::project::project;
//! use serde_json::json;
//!
//! let payload = Payload::from_value(json!({
//!     "nested": { "foo": "bar", "with": "extras" },
//! }));
//! let matched = RulePathSet::parse(["nested.foo"]);
//!
//! let validated = project(&payload, &matched);
//! assert_eq!(validated.into_value(), json!({ "nested": { "foo": "bar" } }));
//! ```

pub mod errors;
pub mod path;
pub mod payload;
pub mod project;

// Re-export commonly used types at crate root
pub use errors::{FieldErrors, FormRequestError};
pub use path::{RulePath, RulePathSet};
pub use payload::Payload;
