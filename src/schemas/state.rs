//! Negotiation state schema

use serde::{Deserialize, Serialize};

/// State of a negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NegotiationState {
    /// Negotiation created, nothing exchanged yet
    Init,
    /// Learning what the counterparty can supply
    CapabilityDiscovery,
    /// Opening anchor sent
    AnchorProposed,
    /// Rounds of offers and counter-offers
    Negotiating,
    /// No progress; waiting or about to give up
    Stalled,
    /// A proposal broke institutional policy
    PolicyViolation,
    /// Terms agreed in principle
    AgreementDraft,
    /// Waiting for a human to sign off
    HumanApproval,
    /// Agreement committed (terminal)
    Commit,
    /// Negotiation abandoned (terminal)
    Abort,
}

impl NegotiationState {
    /// The canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            NegotiationState::Init => "INIT",
            NegotiationState::CapabilityDiscovery => "CAPABILITY_DISCOVERY",
            NegotiationState::AnchorProposed => "ANCHOR_PROPOSED",
            NegotiationState::Negotiating => "NEGOTIATING",
            NegotiationState::Stalled => "STALLED",
            NegotiationState::PolicyViolation => "POLICY_VIOLATION",
            NegotiationState::AgreementDraft => "AGREEMENT_DRAFT",
            NegotiationState::HumanApproval => "HUMAN_APPROVAL",
            NegotiationState::Commit => "COMMIT",
            NegotiationState::Abort => "ABORT",
        }
    }
}

impl std::fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NegotiationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INIT" => Ok(NegotiationState::Init),
            "CAPABILITY_DISCOVERY" => Ok(NegotiationState::CapabilityDiscovery),
            "ANCHOR_PROPOSED" => Ok(NegotiationState::AnchorProposed),
            "NEGOTIATING" => Ok(NegotiationState::Negotiating),
            "STALLED" => Ok(NegotiationState::Stalled),
            "POLICY_VIOLATION" => Ok(NegotiationState::PolicyViolation),
            "AGREEMENT_DRAFT" => Ok(NegotiationState::AgreementDraft),
            "HUMAN_APPROVAL" => Ok(NegotiationState::HumanApproval),
            "COMMIT" => Ok(NegotiationState::Commit),
            "ABORT" => Ok(NegotiationState::Abort),
            _ => Err(format!("Unknown negotiation state: {}", s)),
        }
    }
}
