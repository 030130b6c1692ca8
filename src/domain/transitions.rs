//! State transition logic
//!
//! Pure functions: nothing here stores or mutates a negotiation. Callers own
//! their [`NegotiationContext`] and write the returned state back themselves.

use crate::errors::{IllegalTransitionError, Result};
use crate::schemas::{NegotiationContext, NegotiationState, Terms};

use super::invariants::InvariantChecker;
use super::states::{allowed_next_states, check_structure};

/// Contextual data supplied by external collaborators for one proposed step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionContext {
    /// A valid human approval token is present
    pub approval_valid: bool,

    /// An emergency override has been issued
    pub emergency_override: bool,

    /// Terms before the step, if known
    pub old_terms: Option<Terms>,

    /// Terms after the step, if known
    pub new_terms: Option<Terms>,
}

impl TransitionContext {
    /// Context carrying a human approval
    pub fn approved() -> Self {
        TransitionContext {
            approval_valid: true,
            ..Default::default()
        }
    }

    /// Builder-style setter for the before/after terms
    pub fn with_terms(mut self, old_terms: Terms, new_terms: Terms) -> Self {
        self.old_terms = Some(old_terms);
        self.new_terms = Some(new_terms);
        self
    }
}

/// Validate a single-step transition against the canonical table.
///
/// Terminal states reject every proposal, including staying where they are.
/// Otherwise `proposed` must be an allowed successor of `current`. On success
/// `proposed` is returned unchanged.
pub fn transition(
    current: NegotiationState,
    proposed: NegotiationState,
) -> std::result::Result<NegotiationState, IllegalTransitionError> {
    check_structure(current, proposed, |to| {
        allowed_next_states(current).contains(&to)
    })
}

/// Run the invariant battery, then the structural check.
///
/// Both must pass for the step to count as committed.
pub fn validate_step(
    checker: &InvariantChecker,
    current: NegotiationState,
    proposed: NegotiationState,
    ctx: &TransitionContext,
) -> Result<NegotiationState> {
    checker.check(
        current,
        proposed,
        ctx.approval_valid,
        ctx.emergency_override,
        ctx.old_terms.as_ref(),
        ctx.new_terms.as_ref(),
    )?;

    let next = transition(current, proposed).inspect_err(|e| {
        tracing::warn!(%current, %proposed, "{}", e);
    })?;

    tracing::debug!(from = %current, to = %next, "transition accepted");
    Ok(next)
}

/// Validate a step and return the negotiation as it would be after it.
///
/// The input context is never mutated. Entering NEGOTIATING (including the
/// NEGOTIATING self-loop) starts a new round.
pub fn advance(
    checker: &InvariantChecker,
    negotiation: &NegotiationContext,
    proposed: NegotiationState,
    ctx: &TransitionContext,
) -> Result<NegotiationContext> {
    let next = validate_step(checker, negotiation.state, proposed, ctx)?;

    let round = if next == NegotiationState::Negotiating {
        negotiation.round.saturating_add(1)
    } else {
        negotiation.round
    };

    Ok(negotiation.clone().with_state(next).with_round(round))
}
