//! Error types for dealgate
//!
//! The two core failure kinds are kept disjoint: structural problems with a
//! transition (`IllegalTransitionError`) and contextual safety failures
//! (`InvariantViolation`). Both are folded into `DealgateError` for callers
//! that want a single error type, and each error has a code for programmatic
//! handling.

use thiserror::Error;

use crate::schemas::NegotiationState;

/// Result type alias for dealgate operations
pub type Result<T> = std::result::Result<T, DealgateError>;

/// A transition rejected by the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalTransitionError {
    /// The current state is terminal; nothing may follow it
    #[error("Cannot transition out of terminal state {from}")]
    TerminalState { from: NegotiationState },

    /// The proposed state is not a successor of the current one
    #[error("Illegal transition: {from} -> {to}")]
    NotAllowed {
        from: NegotiationState,
        to: NegotiationState,
    },
}

impl IllegalTransitionError {
    /// The state the rejected transition started from
    pub fn from_state(&self) -> NegotiationState {
        match self {
            IllegalTransitionError::TerminalState { from } => *from,
            IllegalTransitionError::NotAllowed { from, .. } => *from,
        }
    }
}

/// Stable identifier of a safety invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantId {
    /// No commit without approval or emergency override
    S1,
    /// Concessions never reverse
    S2,
    /// Terminal states are absorbing
    S3,
}

impl InvariantId {
    /// The machine-checkable code for this invariant
    pub fn code(&self) -> &'static str {
        match self {
            InvariantId::S1 => "INV_S1",
            InvariantId::S2 => "INV_S2",
            InvariantId::S3 => "INV_S3",
        }
    }
}

impl std::fmt::Display for InvariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A proposed transition failed a safety invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{id}] {message}")]
pub struct InvariantViolation {
    /// Which invariant failed
    pub id: InvariantId,
    /// Human-readable explanation
    pub message: String,
}

impl InvariantViolation {
    pub fn new(id: InvariantId, message: impl Into<String>) -> Self {
        InvariantViolation {
            id,
            message: message.into(),
        }
    }
}

/// A transition table that does not cover the state set correctly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// A state has no entry at all
    #[error("Transition table has no entry for state {0}")]
    MissingEntry(NegotiationState),

    /// A terminal state was given successors
    #[error("Terminal state {0} must not have successors")]
    TerminalHasSuccessors(NegotiationState),
}

/// Main error type for all dealgate operations
#[derive(Debug, Error)]
pub enum DealgateError {
    /// Structural transition failure
    #[error("State transition error: {0}")]
    IllegalTransition(#[from] IllegalTransitionError),

    /// Safety invariant failure
    #[error("Invariant violation: {0}")]
    InvariantViolation(#[from] InvariantViolation),

    /// Malformed transition table
    #[error("Invalid transition table: {0}")]
    InvalidTable(#[from] TableError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid JSON format
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DealgateError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            DealgateError::IllegalTransition(_) => "ILLEGAL_TRANSITION",
            DealgateError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            DealgateError::InvalidTable(_) => "INVALID_TABLE",
            DealgateError::ConfigError(_) => "CONFIG_ERROR",
            DealgateError::InvalidJson(_) => "INVALID_JSON",
            DealgateError::FileNotFound(_) => "FILE_NOT_FOUND",
            DealgateError::Io(_) => "IO_ERROR",
        }
    }

    /// The invariant identifier, if this is an invariant violation
    pub fn invariant_id(&self) -> Option<InvariantId> {
        match self {
            DealgateError::InvariantViolation(v) => Some(v.id),
            _ => None,
        }
    }
}

/// Convert an error to an appropriate exit code
pub fn to_exit_code(error: &DealgateError) -> i32 {
    match error {
        DealgateError::ConfigError(_)
        | DealgateError::InvalidJson(_)
        | DealgateError::FileNotFound(_) => 2,
        _ => 1,
    }
}
