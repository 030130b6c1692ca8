//! Safety invariants checked before a transition takes effect
//!
//! These depend on context the transition table cannot see: approval and
//! override flags, and the terms before and after the move. Evaluation order
//! is fixed (INV_S3, INV_S1, INV_S2) and stops at the first failure, which
//! decides the reported violation when several apply.

use lazy_static::lazy_static;

use crate::errors::{InvariantId, InvariantViolation};
use crate::schemas::{Config, NegotiationState, Terms, TermsRequirement};

use super::concessions::ConcessionPolicy;
use super::states::is_terminal_state;

lazy_static! {
    static ref DEFAULT_CHECKER: InvariantChecker = InvariantChecker::default();
}

/// INV_S3: terminal states are absorbing.
///
/// Leaving COMMIT or ABORT for any other state is a violation. Staying put is
/// not one here; the state machine rejects that separately.
pub fn check_terminal_absorption(
    prev: NegotiationState,
    next: NegotiationState,
) -> Result<(), InvariantViolation> {
    if is_terminal_state(prev) && prev != next {
        return Err(InvariantViolation::new(
            InvariantId::S3,
            format!("Cannot transition out of terminal state {}", prev),
        ));
    }
    Ok(())
}

/// INV_S1: COMMIT needs a valid human approval or an emergency override.
pub fn check_unauthorized_commit(
    next: NegotiationState,
    approval_valid: bool,
    emergency_override: bool,
) -> Result<(), InvariantViolation> {
    if next == NegotiationState::Commit && !(approval_valid || emergency_override) {
        return Err(InvariantViolation::new(
            InvariantId::S1,
            "Cannot COMMIT without valid approval or emergency override",
        ));
    }
    Ok(())
}

/// INV_S2: concessions never reverse.
///
/// Only evaluated when both snapshots are present and non-empty.
pub fn check_concessions(
    policy: &ConcessionPolicy,
    old_terms: &Terms,
    new_terms: &Terms,
) -> Result<(), InvariantViolation> {
    policy.evaluate(old_terms, new_terms)
}

/// States in which a negotiation is expected to carry terms.
fn terms_expected(prev: NegotiationState) -> bool {
    match prev {
        NegotiationState::Negotiating
        | NegotiationState::Stalled
        | NegotiationState::PolicyViolation
        | NegotiationState::AgreementDraft
        | NegotiationState::HumanApproval => true,
        NegotiationState::Init
        | NegotiationState::CapabilityDiscovery
        | NegotiationState::AnchorProposed
        | NegotiationState::Commit
        | NegotiationState::Abort => false,
    }
}

/// The invariant battery with its configurable parts.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    policy: ConcessionPolicy,
    terms_requirement: TermsRequirement,
}

impl InvariantChecker {
    pub fn new(policy: ConcessionPolicy, terms_requirement: TermsRequirement) -> Self {
        InvariantChecker {
            policy,
            terms_requirement,
        }
    }

    /// Build a checker from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ConcessionPolicy::from_config(&config.concession_rules),
            config.terms_requirement,
        )
    }

    pub fn policy(&self) -> &ConcessionPolicy {
        &self.policy
    }

    pub fn terms_requirement(&self) -> TermsRequirement {
        self.terms_requirement
    }

    /// Evaluate INV_S3, INV_S1 and INV_S2 in that order.
    ///
    /// # Errors
    /// The first violated invariant, tagged with its [`InvariantId`].
    pub fn check(
        &self,
        prev: NegotiationState,
        next: NegotiationState,
        approval_valid: bool,
        emergency_override: bool,
        old_terms: Option<&Terms>,
        new_terms: Option<&Terms>,
    ) -> Result<(), InvariantViolation> {
        let result = self.evaluate(prev, next, approval_valid, emergency_override, old_terms, new_terms);
        match &result {
            Ok(()) => tracing::debug!(%prev, %next, "invariants satisfied"),
            Err(violation) => {
                tracing::warn!(%prev, %next, id = %violation.id, "{}", violation.message)
            }
        }
        result
    }

    fn evaluate(
        &self,
        prev: NegotiationState,
        next: NegotiationState,
        approval_valid: bool,
        emergency_override: bool,
        old_terms: Option<&Terms>,
        new_terms: Option<&Terms>,
    ) -> Result<(), InvariantViolation> {
        check_terminal_absorption(prev, next)?;
        check_unauthorized_commit(next, approval_valid, emergency_override)?;

        // An empty snapshot carries no terms
        let old_terms = old_terms.filter(|terms| !terms.is_empty());
        let new_terms = new_terms.filter(|terms| !terms.is_empty());

        if self.terms_requirement == TermsRequirement::RequiredFromNegotiating && terms_expected(prev) {
            self.require_terms(old_terms, new_terms)?;
        }

        match (old_terms, new_terms) {
            (Some(old), Some(new)) => check_concessions(&self.policy, old, new),
            _ => Ok(()),
        }
    }

    /// Both snapshots must be present and carry every field a rule watches.
    fn require_terms(&self, old: Option<&Terms>, new: Option<&Terms>) -> Result<(), InvariantViolation> {
        let (Some(old), Some(new)) = (old, new) else {
            return Err(InvariantViolation::new(
                InvariantId::S2,
                format!(
                    "Terms before and after the move are required from {} onward",
                    NegotiationState::Negotiating
                ),
            ));
        };

        let missing = self
            .policy
            .watched_fields()
            .into_iter()
            .find(|field| old.get(field).is_none() || new.get(field).is_none());
        match missing {
            Some(field) => Err(InvariantViolation::new(
                InvariantId::S2,
                format!("Terms before and after the move must both carry {}", field),
            )),
            None => Ok(()),
        }
    }
}

/// Check all safety invariants for `prev -> next` with the default policy.
///
/// The default policy only guards `unit_price` and skips the concession check
/// when either terms snapshot is absent or empty.
pub fn check_all_invariants(
    prev: NegotiationState,
    next: NegotiationState,
    approval_valid: bool,
    emergency_override: bool,
    old_terms: Option<&Terms>,
    new_terms: Option<&Terms>,
) -> Result<(), InvariantViolation> {
    DEFAULT_CHECKER.check(prev, next, approval_valid, emergency_override, old_terms, new_terms)
}
