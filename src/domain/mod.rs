//! Domain logic for negotiation states, transitions and safety invariants

mod concessions;
mod invariants;
mod states;
mod transitions;


pub use concessions::{ConcessionPolicy, ConcessionRule, FieldDirection, PredicateRule};
pub use invariants::{
    check_all_invariants, check_concessions, check_terminal_absorption,
    check_unauthorized_commit, InvariantChecker,
};
pub use states::{
    allowed_next_states, can_transition, is_terminal_state, TransitionTable, NEGOTIATION_STATES,
    TERMINAL_STATES,
};
pub use transitions::{advance, transition, validate_step, TransitionContext};
