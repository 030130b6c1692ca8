//! Simulate command - Mocked medical procurement negotiation
//!
//! Drives a negotiation from INIT to a terminal state through the kernel,
//! then shows that the terminal state cannot be left. All counterparty data
//! is mocked from the `simulation` config block.

use std::path::Path;

use crate::domain::{advance, transition, InvariantChecker, TransitionContext};
use crate::errors::{DealgateError, InvariantId, Result};
use crate::fs;
use crate::schemas::{NegotiationContext, NegotiationState, SimulationConfig, Terms, UNIT_PRICE};

/// Decisions made by the out-of-band collaborators at the approval step
#[derive(Debug, Clone, Copy, Default)]
pub struct ApprovalOutcome {
    pub approval_valid: bool,
    pub emergency_override: bool,
}

/// What happened during a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    /// Final negotiation context
    pub negotiation: NegotiationContext,
    /// Every state visited, starting with INIT
    pub path: Vec<NegotiationState>,
    /// Violations the kernel raised along the way
    pub rejections: Vec<InvariantId>,
    /// The post-terminal transition was refused
    pub reopen_refused: bool,
}

struct Simulation<'a> {
    checker: &'a InvariantChecker,
    negotiation: NegotiationContext,
    path: Vec<NegotiationState>,
    rejections: Vec<InvariantId>,
}

impl<'a> Simulation<'a> {
    fn new(checker: &'a InvariantChecker, negotiation_id: &str) -> Self {
        let negotiation = NegotiationContext::new(negotiation_id);
        println!("[OK] Negotiation initialized: {}", negotiation.negotiation_id);
        println!("     State: {}", negotiation.state);
        Simulation {
            checker,
            path: vec![negotiation.state],
            negotiation,
            rejections: Vec::new(),
        }
    }

    fn step(&mut self, to: NegotiationState, ctx: &TransitionContext) -> Result<()> {
        println!();
        println!("[TRANSITION] {} -> {}", self.negotiation.state, to);
        match advance(self.checker, &self.negotiation, to, ctx) {
            Ok(next) => {
                self.negotiation = next;
                self.path.push(to);
                if to == NegotiationState::Negotiating {
                    println!("     State: {} (Round {})", to, self.negotiation.round);
                } else {
                    println!("     State: {}", to);
                }
                Ok(())
            }
            Err(e) => {
                if let Some(id) = e.invariant_id() {
                    self.rejections.push(id);
                }
                println!("     [REJECTED] {}", e);
                Err(e)
            }
        }
    }

    fn state(&self) -> NegotiationState {
        self.negotiation.state
    }
}

fn price(value: f64) -> Terms {
    Terms::new().with(UNIT_PRICE, value)
}

/// Run the scenario and return what happened.
///
/// Invariant rejections are part of the story: a reversed concession sends
/// the negotiation to POLICY_VIOLATION and then ABORT, and a refused approval
/// aborts it. Only unexpected structural errors are returned as `Err`.
pub fn simulate(
    checker: &InvariantChecker,
    settings: &SimulationConfig,
    outcome: ApprovalOutcome,
) -> Result<SimulationReport> {
    let mut sim = Simulation::new(checker, &settings.negotiation_id);
    let none = TransitionContext::default();

    sim.step(NegotiationState::CapabilityDiscovery, &none)?;
    sim.step(NegotiationState::AnchorProposed, &none)?;
    println!("     Terms: unit_price {:.2} [MOCKED - Policy-defined anchor]", settings.anchor_unit_price);

    sim.step(NegotiationState::Negotiating, &none)?;
    println!("     Vendor counter: [MOCKED]");
    println!(
        "     Our response: unit_price {:.2} [MOCKED - policy-validated]",
        settings.counter_unit_price
    );

    let concession = TransitionContext::default().with_terms(
        price(settings.anchor_unit_price),
        price(settings.counter_unit_price),
    );
    let conceded = match sim.step(NegotiationState::Negotiating, &concession) {
        Ok(()) => true,
        Err(DealgateError::InvariantViolation(_)) => false,
        Err(e) => return Err(e),
    };

    // Later steps restate the last accepted terms unchanged
    let agreed = if conceded {
        settings.counter_unit_price
    } else {
        settings.anchor_unit_price
    };
    let hold = TransitionContext::default().with_terms(price(agreed), price(agreed));

    if conceded {
        sim.step(NegotiationState::AgreementDraft, &hold)?;
        println!("     Final terms: unit_price {:.2}", agreed);

        sim.step(NegotiationState::HumanApproval, &hold)?;
        println!("     [WAITING] Human approval required...");
        if outcome.approval_valid {
            println!("     [OK] Approval granted");
        } else {
            println!("     [DENIED] Approval not granted");
        }
        if outcome.emergency_override {
            println!("     [OVERRIDE] Emergency override issued");
        }

        let authority = TransitionContext {
            approval_valid: outcome.approval_valid,
            emergency_override: outcome.emergency_override,
            ..hold.clone()
        };
        println!();
        println!("[CHECKING] Safety invariants...");
        match sim.step(NegotiationState::Commit, &authority) {
            Ok(()) => println!("     [OK] Negotiation committed"),
            Err(DealgateError::InvariantViolation(_)) => {
                sim.step(NegotiationState::Abort, &hold)?;
                println!("     [OK] Negotiation aborted without commitment");
            }
            Err(e) => return Err(e),
        }
    } else {
        sim.step(NegotiationState::PolicyViolation, &hold)?;
        sim.step(NegotiationState::Abort, &hold)?;
        println!("     [OK] Negotiation aborted after policy violation");
    }

    println!();
    println!("[DEMONSTRATION] Attempting illegal transition from terminal state...");
    let reopen_refused = match transition(sim.state(), NegotiationState::Negotiating) {
        Ok(_) => {
            tracing::error!(state = %sim.state(), "terminal state was reopened");
            println!("     [ERROR] Transition succeeded (should have failed)");
            false
        }
        Err(e) => {
            println!("     [OK] Transition rejected: {}", e);
            true
        }
    };

    Ok(SimulationReport {
        negotiation: sim.negotiation,
        path: sim.path,
        rejections: sim.rejections,
        reopen_refused,
    })
}

/// Run the simulation command
pub fn run(
    checker: &InvariantChecker,
    settings: &SimulationConfig,
    outcome: ApprovalOutcome,
    out: Option<&Path>,
) -> Result<()> {
    let rule = "=".repeat(60);
    println!("{}", rule);
    println!("MEDICAL PROCUREMENT NEGOTIATION SIMULATION");
    println!("(Mocked data for demonstration purposes)");
    println!("{}", rule);
    println!();

    let report = simulate(checker, settings, outcome)?;
    tracing::info!(
        negotiation_id = %report.negotiation.negotiation_id,
        state = %report.negotiation.state,
        rounds = report.negotiation.round,
        "simulation finished"
    );

    if let Some(path) = out {
        fs::write_json(path, &report.negotiation)?;
        tracing::info!(path = %path.display(), "final negotiation context written");
    }

    println!();
    println!("{}", rule);
    println!("SIMULATION COMPLETE");
    println!("{}", rule);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConcessionPolicy;
    use crate::schemas::TermsRequirement;
    use tempfile::TempDir;
    use NegotiationState::*;

    fn approved() -> ApprovalOutcome {
        ApprovalOutcome {
            approval_valid: true,
            emergency_override: false,
        }
    }

    #[test]
    fn test_simulation_commits_with_approval() {
        let checker = InvariantChecker::default();
        let report = simulate(&checker, &SimulationConfig::default(), approved()).unwrap();

        assert_eq!(
            report.path,
            vec![
                Init,
                CapabilityDiscovery,
                AnchorProposed,
                Negotiating,
                Negotiating,
                AgreementDraft,
                HumanApproval,
                Commit
            ]
        );
        assert_eq!(report.negotiation.round, 2);
        assert!(report.rejections.is_empty());
        assert!(report.reopen_refused);
    }

    #[test]
    fn test_simulation_commits_with_override() {
        let checker = InvariantChecker::default();
        let outcome = ApprovalOutcome {
            approval_valid: false,
            emergency_override: true,
        };
        let report = simulate(&checker, &SimulationConfig::default(), outcome).unwrap();
        assert_eq!(report.negotiation.state, Commit);
    }

    #[test]
    fn test_simulation_aborts_without_approval() {
        let checker = InvariantChecker::default();
        let report =
            simulate(&checker, &SimulationConfig::default(), ApprovalOutcome::default()).unwrap();

        assert_eq!(report.negotiation.state, Abort);
        assert_eq!(report.rejections, vec![InvariantId::S1]);
        assert_eq!(report.path.last(), Some(&Abort));
        assert!(!report.path.contains(&Commit));
        assert!(report.reopen_refused);
    }

    #[test]
    fn test_simulation_price_reversal_aborts() {
        let checker = InvariantChecker::default();
        let settings = SimulationConfig {
            anchor_unit_price: 0.90,
            counter_unit_price: 1.00,
            ..Default::default()
        };
        let report = simulate(&checker, &settings, approved()).unwrap();

        assert_eq!(report.rejections, vec![InvariantId::S2]);
        assert_eq!(&report.path[3..], &[Negotiating, PolicyViolation, Abort]);
    }

    #[test]
    fn test_simulation_under_strict_terms() {
        let checker = InvariantChecker::new(
            ConcessionPolicy::standard(),
            TermsRequirement::RequiredFromNegotiating,
        );
        let report = simulate(&checker, &SimulationConfig::default(), approved()).unwrap();
        assert!(report.rejections.is_empty());
        assert_eq!(report.negotiation.state, Commit);

        let report =
            simulate(&checker, &SimulationConfig::default(), ApprovalOutcome::default()).unwrap();
        assert_eq!(report.negotiation.state, Abort);
    }

    #[test]
    fn test_run_writes_final_context() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out").join("sim.json");
        let checker = InvariantChecker::default();

        run(&checker, &SimulationConfig::default(), approved(), Some(&path)).unwrap();

        let written: NegotiationContext = fs::read_json(&path).unwrap();
        assert_eq!(written.negotiation_id, "SIM-001");
        assert_eq!(written.state, Commit);
    }
}
