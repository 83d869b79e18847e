//! Balance policy: which descriptions may carry a negative running balance.
//!
//! Rules are data so they can be audited and overridden from configuration without touching the
//! validator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceEffect {
    /// Rows matching the pattern may have a balance below zero (overdraft on a current account).
    #[default]
    AllowNegative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRule {
    /// Substring matched against the row description.
    pub pattern: String,

    #[serde(default)]
    pub effect: BalanceEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancePolicy {
    pub rules: Vec<BalanceRule>,
}

impl Default for BalancePolicy {
    fn default() -> Self {
        Self {
            rules: vec![BalanceRule {
                pattern: "当座".to_string(),
                effect: BalanceEffect::AllowNegative,
            }],
        }
    }
}

impl BalancePolicy {
    /// A policy with no exemptions.
    pub fn strict() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn allows_negative(&self, description: &str) -> bool {
        self.rules.iter().any(|rule| {
            rule.effect == BalanceEffect::AllowNegative
                && !rule.pattern.is_empty()
                && description.contains(&rule.pattern)
        })
    }
}
