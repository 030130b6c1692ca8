//! Check command - Vet one proposed transition

use serde::Serialize;

use crate::domain::{validate_step, InvariantChecker, TransitionContext};
use crate::errors::{DealgateError, Result};
use crate::schemas::{NegotiationState, Terms};

/// Machine-readable verdict for one proposed step
#[derive(Debug, Serialize, PartialEq)]
pub struct CheckReport {
    pub from: NegotiationState,
    pub to: NegotiationState,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invariant_id: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub approval: bool,
    pub emergency_override: bool,
    pub old_terms: Option<String>,
    pub new_terms: Option<String>,
    pub json: bool,
}

fn parse_terms(raw: Option<&str>, label: &str) -> Result<Option<Terms>> {
    raw.map(|s| {
        serde_json::from_str(s)
            .map_err(|e| DealgateError::InvalidJson(format!("Invalid {}: {}", label, e)))
    })
    .transpose()
}

/// Evaluate a step and describe the outcome
pub fn evaluate(
    checker: &InvariantChecker,
    from: NegotiationState,
    to: NegotiationState,
    ctx: &TransitionContext,
) -> (CheckReport, Result<NegotiationState>) {
    let result = validate_step(checker, from, to, ctx);
    let report = match &result {
        Ok(_) => CheckReport {
            from,
            to,
            accepted: true,
            error_code: None,
            invariant_id: None,
            message: None,
        },
        Err(e) => CheckReport {
            from,
            to,
            accepted: false,
            error_code: Some(e.code()),
            invariant_id: e.invariant_id().map(|id| id.code()),
            message: Some(e.to_string()),
        },
    };
    (report, result)
}

/// Check one transition and print the verdict
pub fn run(
    checker: &InvariantChecker,
    from: NegotiationState,
    to: NegotiationState,
    options: &CheckOptions,
) -> Result<()> {
    let ctx = TransitionContext {
        approval_valid: options.approval,
        emergency_override: options.emergency_override,
        old_terms: parse_terms(options.old_terms.as_deref(), "old terms")?,
        new_terms: parse_terms(options.new_terms.as_deref(), "new terms")?,
    };

    let (report, result) = evaluate(checker, from, to, &ctx);

    if options.json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| DealgateError::InvalidJson(e.to_string()))?;
        println!("{}", out);
    } else if report.accepted {
        println!("[OK] {} -> {} accepted", from, to);
    }

    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::UNIT_PRICE;
    use NegotiationState::*;

    #[test]
    fn test_parse_terms() {
        let terms = parse_terms(Some(r#"{"unit_price": 0.9}"#), "old terms").unwrap();
        assert_eq!(terms.unwrap().get(UNIT_PRICE), Some(0.9));
        assert_eq!(parse_terms(None, "old terms").unwrap(), None);

        let err = parse_terms(Some("[1, 2]"), "new terms").unwrap_err();
        assert!(err.to_string().contains("Invalid new terms"));
    }

    #[test]
    fn test_evaluate_accepted() {
        let checker = InvariantChecker::default();
        let (report, result) = evaluate(&checker, HumanApproval, Commit, &TransitionContext::approved());
        assert!(report.accepted);
        assert_eq!(result.unwrap(), Commit);
    }

    #[test]
    fn test_evaluate_invariant_rejection() {
        let checker = InvariantChecker::default();
        let (report, result) = evaluate(&checker, HumanApproval, Commit, &TransitionContext::default());
        assert!(!report.accepted);
        assert_eq!(report.error_code, Some("INVARIANT_VIOLATION"));
        assert_eq!(report.invariant_id, Some("INV_S1"));
        assert!(result.is_err());
    }

    #[test]
    fn test_evaluate_structural_rejection() {
        let checker = InvariantChecker::default();
        let (report, _) = evaluate(&checker, Init, Negotiating, &TransitionContext::default());
        assert_eq!(report.error_code, Some("ILLEGAL_TRANSITION"));
        assert_eq!(report.invariant_id, None);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("invariant_id").is_none());
        assert_eq!(json["from"], "INIT");
    }

    #[test]
    fn test_run_rejects_bad_terms_json() {
        let checker = InvariantChecker::default();
        let options = CheckOptions {
            old_terms: Some("{not json".to_string()),
            ..Default::default()
        };
        let err = run(&checker, Negotiating, Negotiating, &options).unwrap_err();
        assert_eq!(err.code(), "INVALID_JSON");
    }
}
