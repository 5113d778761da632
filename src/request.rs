use formgate_core::{Payload, RulePathSet};

/// A request definition: declared rules, an authorization check, and
/// optional payload hooks.
///
/// Implementations are plain types describing one endpoint's input contract.
/// Every method except [`rules`](FormRequest::rules) has a default, so a
/// minimal definition declares its rule paths and nothing else.
pub trait FormRequest {
    /// The rule paths this request declares, e.g. `name`, `nested.foo`,
    /// `array.*`.
    fn rules(&self) -> RulePathSet;

    /// Whether the caller may make this request at all. Denial aborts the
    /// lifecycle before validation runs.
    fn authorize(&self) -> bool {
        true
    }

    /// Hook run after authorization and before validation. May mutate the
    /// payload in place; the validator sees the mutated data.
    fn prepare_for_validation(&self, _payload: &mut Payload) {}

    /// Hook run after validation succeeds. May mutate the payload again;
    /// the mutation shows up in the full payload but never changes the
    /// already-recorded matched keys or projection.
    fn passed_validation(&self, _payload: &mut Payload) {}
}
