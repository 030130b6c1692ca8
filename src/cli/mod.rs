//! CLI module for dealgate
//!
//! Provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schemas::NegotiationState;

/// Dealgate - a safety kernel for governed procurement negotiations
#[derive(Parser, Debug)]
#[command(name = "dealgate")]
#[command(version)]
#[command(about = "Safety kernel for governed negotiations: gated state machine with invariant checks")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress info-level output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the JSON config file; must exist (defaults to ./dealgate.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the mocked procurement negotiation end to end
    Simulate {
        /// The human approver declines at the final step
        #[arg(long)]
        reject_approval: bool,

        /// Issue an emergency override at the final step
        #[arg(long)]
        emergency_override: bool,

        /// Write the final negotiation context to this JSON file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Check one proposed transition against the invariants and the table
    Check {
        /// Current state (e.g. HUMAN_APPROVAL)
        #[arg(long)]
        from: NegotiationState,

        /// Proposed next state (e.g. COMMIT)
        #[arg(long)]
        to: NegotiationState,

        /// A valid human approval token is present
        #[arg(long)]
        approval: bool,

        /// An emergency override has been issued
        #[arg(long)]
        emergency_override: bool,

        /// Terms before the step as a JSON object, e.g. '{"unit_price": 0.9}'
        #[arg(long)]
        old_terms: Option<String>,

        /// Terms after the step as a JSON object
        #[arg(long)]
        new_terms: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the transition table
    Table {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
