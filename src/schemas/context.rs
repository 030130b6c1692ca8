//! Negotiation context - the caller-owned record of one negotiation

use serde::{Deserialize, Serialize};

use super::NegotiationState;

/// Per-negotiation record owned by the orchestrator.
///
/// The kernel never holds on to one of these; it reads values passed in and
/// hands back new ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationContext {
    /// Opaque negotiation identifier
    pub negotiation_id: String,

    /// Current state
    #[serde(default = "default_state")]
    pub state: NegotiationState,

    /// Number of negotiation rounds entered so far
    #[serde(default)]
    pub round: u32,

    /// ISO 8601 last update timestamp
    #[serde(default = "now_rfc3339")]
    pub updated_at: String,
}

fn default_state() -> NegotiationState {
    NegotiationState::Init
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl NegotiationContext {
    /// Create a new negotiation in the INIT state
    pub fn new(negotiation_id: impl Into<String>) -> Self {
        NegotiationContext {
            negotiation_id: negotiation_id.into(),
            state: NegotiationState::Init,
            round: 0,
            updated_at: now_rfc3339(),
        }
    }

    /// Return a copy with a new state and refreshed timestamp
    pub fn with_state(mut self, state: NegotiationState) -> Self {
        self.state = state;
        self.updated_at = now_rfc3339();
        self
    }

    /// Return a copy with the round counter set
    pub fn with_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    /// Whether the negotiation has reached COMMIT or ABORT
    pub fn is_finalized(&self) -> bool {
        crate::domain::is_terminal_state(self.state)
    }
}
