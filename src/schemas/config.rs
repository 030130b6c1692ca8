//! Config schema - Configuration for dealgate

use serde::{Deserialize, Serialize};

use super::terms::UNIT_PRICE;

/// Direction a term may move in across concessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The value may stay or go down (e.g. price paid by the buyer)
    NonIncreasing,
    /// The value may stay or go up (e.g. committed volume)
    NonDecreasing,
}

/// Whether terms must be supplied for the concession check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TermsRequirement {
    /// Missing terms skip the concession check
    #[default]
    Optional,
    /// From NEGOTIATING onward, missing terms are a concession violation
    RequiredFromNegotiating,
}

/// One per-field concession rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcessionRuleConfig {
    /// Term key, e.g. "unit_price"
    pub field: String,

    /// Allowed direction of movement
    pub direction: Direction,
}

/// Mocked values used by the `simulate` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Identifier for the simulated negotiation
    #[serde(default = "default_negotiation_id")]
    pub negotiation_id: String,

    /// Policy-defined opening unit price
    #[serde(default = "default_anchor_unit_price")]
    pub anchor_unit_price: f64,

    /// Unit price after the vendor's counter in round one
    #[serde(default = "default_counter_unit_price")]
    pub counter_unit_price: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            negotiation_id: default_negotiation_id(),
            anchor_unit_price: default_anchor_unit_price(),
            counter_unit_price: default_counter_unit_price(),
        }
    }
}

/// Main configuration for dealgate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// How absent terms are treated by the concession check
    #[serde(default)]
    pub terms_requirement: TermsRequirement,

    /// Concession rules, evaluated in order
    #[serde(default = "default_concession_rules")]
    pub concession_rules: Vec<ConcessionRuleConfig>,

    /// Simulation settings
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_schema_version() -> u32 {
    1
}

fn default_concession_rules() -> Vec<ConcessionRuleConfig> {
    vec![ConcessionRuleConfig {
        field: UNIT_PRICE.to_string(),
        direction: Direction::NonIncreasing,
    }]
}

fn default_negotiation_id() -> String {
    "SIM-001".to_string()
}

fn default_anchor_unit_price() -> f64 {
    0.95
}

fn default_counter_unit_price() -> f64 {
    0.90
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schema_version: default_schema_version(),
            terms_requirement: TermsRequirement::Optional,
            concession_rules: default_concession_rules(),
            simulation: SimulationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.terms_requirement, TermsRequirement::Optional);
        assert_eq!(config.concession_rules.len(), 1);
        assert_eq!(config.concession_rules[0].field, "unit_price");
        assert_eq!(config.concession_rules[0].direction, Direction::NonIncreasing);
        assert_eq!(config.simulation.negotiation_id, "SIM-001");
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{"terms_requirement": "required_from_negotiating"}"#;
        let parsed: Config = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.terms_requirement, TermsRequirement::RequiredFromNegotiating);
        // Other fields should have defaults
        assert_eq!(parsed.concession_rules, default_concession_rules());
        assert_eq!(parsed.simulation.anchor_unit_price, 0.95);
    }

    #[test]
    fn test_config_with_extra_rule() {
        let json = r#"{
            "concession_rules": [
                {"field": "unit_price", "direction": "non_increasing"},
                {"field": "volume", "direction": "non_decreasing"}
            ]
        }"#;
        let parsed: Config = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.concession_rules.len(), 2);
        assert_eq!(parsed.concession_rules[1].direction, Direction::NonDecreasing);
    }

    #[test]
    fn test_direction_serialization() {
        assert_eq!(
            serde_json::to_string(&Direction::NonIncreasing).unwrap(),
            "\"non_increasing\""
        );
        assert_eq!(
            serde_json::to_string(&TermsRequirement::Optional).unwrap(),
            "\"optional\""
        );
    }
}
