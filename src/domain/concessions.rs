//! Concession rules
//!
//! A concession is a change in proposed terms between two rounds. Each rule
//! here is a named predicate over `(old_terms, new_terms)`; a
//! [`ConcessionPolicy`] runs them in registration order and reports the first
//! failure as an INV_S2 violation.

use std::fmt;

use crate::errors::{InvariantId, InvariantViolation};
use crate::schemas::{ConcessionRuleConfig, Direction, Terms, UNIT_PRICE};

/// A single monotonicity rule over two snapshots of terms.
pub trait ConcessionRule: Send + Sync + fmt::Debug {
    /// Stable rule name, used in violation messages and listings
    fn name(&self) -> &str;

    /// `Ok(())` if moving from `old` to `new` is acceptable, otherwise the reason.
    fn check(&self, old: &Terms, new: &Terms) -> Result<(), String>;

    /// The term this rule reads, if it watches a single one.
    fn watched_field(&self) -> Option<&str> {
        None
    }
}

/// A term that may only move in one direction.
///
/// The rule does not apply when either snapshot lacks the field. Values are
/// compared as they are, so a comparison involving NaN never fires.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDirection {
    field: String,
    direction: Direction,
    name: String,
}

impl FieldDirection {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        let field = field.into();
        let suffix = match direction {
            Direction::NonIncreasing => "non_increasing",
            Direction::NonDecreasing => "non_decreasing",
        };
        let name = format!("{}_{}", field, suffix);
        FieldDirection {
            field,
            direction,
            name,
        }
    }

    /// The field may stay or go down
    pub fn non_increasing(field: impl Into<String>) -> Self {
        Self::new(field, Direction::NonIncreasing)
    }

    /// The field may stay or go up
    pub fn non_decreasing(field: impl Into<String>) -> Self {
        Self::new(field, Direction::NonDecreasing)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl ConcessionRule for FieldDirection {
    fn name(&self) -> &str {
        &self.name
    }

    fn watched_field(&self) -> Option<&str> {
        Some(&self.field)
    }

    fn check(&self, old: &Terms, new: &Terms) -> Result<(), String> {
        let (Some(before), Some(after)) = (old.get(&self.field), new.get(&self.field)) else {
            return Ok(());
        };

        match self.direction {
            Direction::NonIncreasing if after > before => Err(format!(
                "Concession reversal: {} cannot increase ({} -> {})",
                self.field, before, after
            )),
            Direction::NonDecreasing if after < before => Err(format!(
                "Concession reversal: {} cannot decrease ({} -> {})",
                self.field, before, after
            )),
            _ => Ok(()),
        }
    }
}

/// A rule backed by a closure that returns `true` when the change is acceptable.
pub struct PredicateRule<F> {
    name: String,
    predicate: F,
}

impl<F> PredicateRule<F>
where
    F: Fn(&Terms, &Terms) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        PredicateRule {
            name: name.into(),
            predicate,
        }
    }
}

impl<F> fmt::Debug for PredicateRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRule").field("name", &self.name).finish()
    }
}

impl<F> ConcessionRule for PredicateRule<F>
where
    F: Fn(&Terms, &Terms) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, old: &Terms, new: &Terms) -> Result<(), String> {
        if (self.predicate)(old, new) {
            Ok(())
        } else {
            Err(format!("Concession rule {} rejected the new terms", self.name))
        }
    }
}

/// Ordered registry of concession rules.
#[derive(Debug)]
pub struct ConcessionPolicy {
    rules: Vec<Box<dyn ConcessionRule>>,
}

impl ConcessionPolicy {
    /// A policy with no rules; every concession passes.
    pub fn empty() -> Self {
        ConcessionPolicy { rules: Vec::new() }
    }

    /// The baseline policy: unit price must never increase.
    pub fn standard() -> Self {
        Self::empty().with_rule(FieldDirection::non_increasing(UNIT_PRICE))
    }

    /// Build a policy from configured per-field rules.
    pub fn from_config(rules: &[ConcessionRuleConfig]) -> Self {
        rules.iter().fold(Self::empty(), |policy, rule| {
            policy.with_rule(FieldDirection::new(rule.field.clone(), rule.direction))
        })
    }

    /// Append a rule; it runs after every rule already registered.
    pub fn with_rule(mut self, rule: impl ConcessionRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Append a closure-backed rule.
    pub fn with_predicate<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Terms, &Terms) -> bool + Send + Sync + 'static,
    {
        self.with_rule(PredicateRule::new(name, predicate))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Fields read by single-field rules, in evaluation order
    pub fn watched_fields(&self) -> Vec<&str> {
        self.rules.iter().filter_map(|r| r.watched_field()).collect()
    }

    /// Run every rule in order, stopping at the first failure.
    pub fn evaluate(&self, old: &Terms, new: &Terms) -> Result<(), InvariantViolation> {
        for rule in &self.rules {
            if let Err(reason) = rule.check(old, new) {
                return Err(InvariantViolation::new(InvariantId::S2, reason));
            }
        }
        Ok(())
    }
}

impl Default for ConcessionPolicy {
    fn default() -> Self {
        ConcessionPolicy::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::VOLUME;

    fn price(p: f64) -> Terms {
        Terms::new().with(UNIT_PRICE, p)
    }

    #[test]
    fn test_field_direction_names() {
        assert_eq!(
            FieldDirection::non_increasing(UNIT_PRICE).name(),
            "unit_price_non_increasing"
        );
        assert_eq!(FieldDirection::non_decreasing(VOLUME).name(), "volume_non_decreasing");
    }

    #[test]
    fn test_price_increase_rejected() {
        let rule = FieldDirection::non_increasing(UNIT_PRICE);
        let err = rule.check(&price(0.90), &price(1.00)).unwrap_err();
        assert!(err.contains("unit_price cannot increase"));
    }

    #[test]
    fn test_price_decrease_and_hold_accepted() {
        let rule = FieldDirection::non_increasing(UNIT_PRICE);
        assert!(rule.check(&price(0.90), &price(0.85)).is_ok());
        assert!(rule.check(&price(0.90), &price(0.90)).is_ok());
    }

    #[test]
    fn test_volume_decrease_rejected() {
        let rule = FieldDirection::non_decreasing(VOLUME);
        let old = Terms::new().with(VOLUME, 1000.0);
        let new = Terms::new().with(VOLUME, 800.0);
        assert!(rule.check(&old, &new).unwrap_err().contains("volume cannot decrease"));
        assert!(rule.check(&new, &old).is_ok());
    }

    #[test]
    fn test_missing_field_skips_rule() {
        let rule = FieldDirection::non_increasing(UNIT_PRICE);
        let volume_only = Terms::new().with(VOLUME, 10.0);
        assert!(rule.check(&volume_only, &price(5.0)).is_ok());
        assert!(rule.check(&price(1.0), &volume_only).is_ok());
    }

    #[test]
    fn test_non_finite_values_use_plain_comparison() {
        let rule = FieldDirection::non_increasing(UNIT_PRICE);
        // Coming down from infinity is a concession
        assert!(rule.check(&price(f64::INFINITY), &price(0.5)).is_ok());
        assert!(rule.check(&price(0.5), &price(f64::INFINITY)).is_err());
        // NaN compares false both ways
        assert!(rule.check(&price(0.9), &price(f64::NAN)).is_ok());
        assert!(rule.check(&price(f64::NAN), &price(0.9)).is_ok());
    }

    #[test]
    fn test_standard_policy() {
        let policy = ConcessionPolicy::standard();
        assert_eq!(policy.rule_names(), vec!["unit_price_non_increasing"]);

        let violation = policy.evaluate(&price(0.90), &price(1.00)).unwrap_err();
        assert_eq!(violation.id, InvariantId::S2);
        assert!(policy.evaluate(&price(0.90), &price(0.85)).is_ok());
    }

    #[test]
    fn test_first_failing_rule_is_reported() {
        let policy = ConcessionPolicy::standard()
            .with_rule(FieldDirection::non_decreasing(VOLUME))
            .with_predicate("always_fails", |_, _| false);

        let old = Terms::new().with(UNIT_PRICE, 1.0).with(VOLUME, 100.0);
        let new = Terms::new().with(UNIT_PRICE, 1.0).with(VOLUME, 50.0);

        let violation = policy.evaluate(&old, &new).unwrap_err();
        assert!(violation.message.contains("volume"));

        let held = Terms::new().with(UNIT_PRICE, 1.0).with(VOLUME, 100.0);
        let violation = policy.evaluate(&old, &held).unwrap_err();
        assert!(violation.message.contains("always_fails"));
    }

    #[test]
    fn test_from_config_preserves_order() {
        let rules = vec![
            ConcessionRuleConfig {
                field: VOLUME.to_string(),
                direction: Direction::NonDecreasing,
            },
            ConcessionRuleConfig {
                field: UNIT_PRICE.to_string(),
                direction: Direction::NonIncreasing,
            },
        ];
        let policy = ConcessionPolicy::from_config(&rules);
        assert_eq!(
            policy.rule_names(),
            vec!["volume_non_decreasing", "unit_price_non_increasing"]
        );
        assert_eq!(policy.watched_fields(), vec![VOLUME, UNIT_PRICE]);
    }

    #[test]
    fn test_predicate_rules_watch_no_field() {
        let policy = ConcessionPolicy::empty().with_predicate("never", |_, _| false);
        assert!(policy.watched_fields().is_empty());
        assert_eq!(policy.rule_names(), vec!["never"]);
    }

    #[test]
    fn test_empty_policy_accepts_everything() {
        let policy = ConcessionPolicy::empty();
        assert!(policy.is_empty());
        assert!(policy.evaluate(&price(1.0), &price(100.0)).is_ok());
    }
}
