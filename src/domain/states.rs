//! Negotiation state machine definitions
//!
//! The happy path runs:
//! INIT → CAPABILITY_DISCOVERY → ANCHOR_PROPOSED → NEGOTIATING → AGREEMENT_DRAFT → HUMAN_APPROVAL → COMMIT
//!
//! NEGOTIATING may loop on itself (one round with no state change) or detour
//! through STALLED / POLICY_VIOLATION, both of which either resume or ABORT.
//! COMMIT and ABORT are absorbing.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{IllegalTransitionError, TableError};
use crate::schemas::NegotiationState;

/// The canonical ordering of negotiation states.
pub const NEGOTIATION_STATES: &[NegotiationState] = &[
    NegotiationState::Init,
    NegotiationState::CapabilityDiscovery,
    NegotiationState::AnchorProposed,
    NegotiationState::Negotiating,
    NegotiationState::Stalled,
    NegotiationState::PolicyViolation,
    NegotiationState::AgreementDraft,
    NegotiationState::HumanApproval,
    NegotiationState::Commit,
    NegotiationState::Abort,
];

/// States from which no transition is legal, including to themselves.
pub const TERMINAL_STATES: &[NegotiationState] = &[NegotiationState::Commit, NegotiationState::Abort];

/// Check if a state is terminal (COMMIT or ABORT).
pub fn is_terminal_state(state: NegotiationState) -> bool {
    match state {
        NegotiationState::Commit | NegotiationState::Abort => true,
        NegotiationState::Init
        | NegotiationState::CapabilityDiscovery
        | NegotiationState::AnchorProposed
        | NegotiationState::Negotiating
        | NegotiationState::Stalled
        | NegotiationState::PolicyViolation
        | NegotiationState::AgreementDraft
        | NegotiationState::HumanApproval => false,
    }
}

/// Returns the states reachable from `current` in one step.
///
/// This match is the source of truth for structural legality. It is
/// exhaustive on purpose: a new state does not compile until it is given a
/// row here.
pub fn allowed_next_states(current: NegotiationState) -> &'static [NegotiationState] {
    use NegotiationState::*;

    match current {
        Init => &[CapabilityDiscovery],
        CapabilityDiscovery => &[AnchorProposed],
        AnchorProposed => &[Negotiating],
        Negotiating => &[Negotiating, Stalled, PolicyViolation, AgreementDraft],
        Stalled => &[Negotiating, Abort],
        PolicyViolation => &[Negotiating, Abort],
        AgreementDraft => &[HumanApproval],
        HumanApproval => &[Commit, Abort],
        Commit | Abort => &[],
    }
}

/// Whether `current -> proposed` is structurally legal.
pub fn can_transition(current: NegotiationState, proposed: NegotiationState) -> bool {
    !is_terminal_state(current) && allowed_next_states(current).contains(&proposed)
}

/// Shared structural check used by both the canonical table and custom tables.
pub(crate) fn check_structure(
    current: NegotiationState,
    proposed: NegotiationState,
    allowed: impl FnOnce(NegotiationState) -> bool,
) -> Result<NegotiationState, IllegalTransitionError> {
    if is_terminal_state(current) {
        return Err(IllegalTransitionError::TerminalState { from: current });
    }
    if !allowed(proposed) {
        return Err(IllegalTransitionError::NotAllowed {
            from: current,
            to: proposed,
        });
    }
    Ok(proposed)
}

/// A transition table held as data.
///
/// Most callers never need one: the free [`transition`](super::transition)
/// function reads the canonical match directly. A table value exists for
/// deployments that narrow the graph (e.g. forbidding STALLED) and for
/// printing. Construction checks that every state has an entry and that
/// terminal states have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    entries: BTreeMap<NegotiationState, BTreeSet<NegotiationState>>,
}

impl TransitionTable {
    /// The canonical table.
    pub fn standard() -> Self {
        let entries = NEGOTIATION_STATES
            .iter()
            .map(|&state| (state, allowed_next_states(state).iter().copied().collect()))
            .collect();
        TransitionTable { entries }
    }

    /// Build a table from explicit rows.
    ///
    /// Rows for the same state are merged.
    ///
    /// # Errors
    /// * `MissingEntry` - if some state has no row (use an empty row for "no successors")
    /// * `TerminalHasSuccessors` - if COMMIT or ABORT is given any successor
    pub fn from_entries<I, S>(rows: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (NegotiationState, S)>,
        S: IntoIterator<Item = NegotiationState>,
    {
        let mut entries: BTreeMap<NegotiationState, BTreeSet<NegotiationState>> = BTreeMap::new();
        for (state, successors) in rows {
            entries.entry(state).or_default().extend(successors);
        }

        for &state in NEGOTIATION_STATES {
            match entries.get(&state) {
                None => return Err(TableError::MissingEntry(state)),
                Some(successors) if is_terminal_state(state) && !successors.is_empty() => {
                    return Err(TableError::TerminalHasSuccessors(state));
                }
                Some(_) => {}
            }
        }

        Ok(TransitionTable { entries })
    }

    /// Successors of `state`, in canonical order.
    pub fn successors(&self, state: NegotiationState) -> Vec<NegotiationState> {
        self.entries
            .get(&state)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether `from -> to` is legal in this table.
    pub fn allows(&self, from: NegotiationState, to: NegotiationState) -> bool {
        !is_terminal_state(from)
            && self
                .entries
                .get(&from)
                .is_some_and(|successors| successors.contains(&to))
    }

    /// Validate a transition against this table.
    ///
    /// Same contract as [`transition`](super::transition): terminal states
    /// reject everything, otherwise `proposed` must be a listed successor.
    pub fn transition(
        &self,
        current: NegotiationState,
        proposed: NegotiationState,
    ) -> Result<NegotiationState, IllegalTransitionError> {
        check_structure(current, proposed, |to| self.allows(current, to))
    }

    /// Rows in canonical state order.
    pub fn rows(&self) -> impl Iterator<Item = (NegotiationState, Vec<NegotiationState>)> + '_ {
        NEGOTIATION_STATES
            .iter()
            .map(move |&state| (state, self.successors(state)))
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        TransitionTable::standard()
    }
}
