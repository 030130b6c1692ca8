//! Dealgate - a safety kernel for governed multi-party negotiations
//!
//! A negotiation (e.g. automated procurement) is a finite state machine whose
//! transitions are gated by safety invariants:
//! - no COMMIT without human approval or an emergency override
//! - concessions never reverse direction
//! - COMMIT and ABORT are final
//!
//! The kernel exposes two pure operations, [`domain::transition`] and
//! [`domain::check_all_invariants`]. Everything else (config loading, the
//! CLI and its simulation) is a thin shell around them.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fs;
pub mod schemas;

// Re-export commonly used types
pub use domain::{check_all_invariants, transition, InvariantChecker};
pub use errors::{
    DealgateError, IllegalTransitionError, InvariantId, InvariantViolation, Result, TableError,
};
pub use schemas::{Config, NegotiationContext, NegotiationState, Terms};
