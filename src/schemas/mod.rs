//! Schema types for dealgate
//!
//! Plain data exchanged between the kernel and its callers.

mod config;
mod context;
mod state;
mod terms;

pub use config::{ConcessionRuleConfig, Config, Direction, SimulationConfig, TermsRequirement};
pub use context::NegotiationContext;
pub use state::NegotiationState;
pub use terms::{Terms, UNIT_PRICE, VOLUME};
