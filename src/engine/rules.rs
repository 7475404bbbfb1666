use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::context::{InvoiceContext, TaxLine};
use super::money;

/// A rule-set that cannot be loaded: unknown rule name or malformed
/// parameters. Raised when a rule-set is parsed, never while applying it.
#[derive(Debug, Error)]
#[error("invalid rule at position {position}: {message}")]
pub struct ConfigurationError {
    pub position: usize,
    pub message: String,
}

/// A named computation step over the accumulating invoice context.
/// Wire shape: `{"rule": "tax", "rate": "0.19"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "lowercase")]
pub enum Rule {
    /// Computes the subtotal from the item line totals.
    Sum,
    /// Computes the tax amount from the subtotal accumulated so far.
    Tax { rate: BigDecimal },
    /// Computes the grand total from subtotal and tax.
    Total,
}

impl Rule {
    /// Parse a stored rule-set into typed rules, preserving order.
    pub fn parse_all(values: &[Value]) -> Result<Vec<Rule>, ConfigurationError> {
        values
            .iter()
            .enumerate()
            .map(|(position, value)| {
                serde_json::from_value(value.clone()).map_err(|e| ConfigurationError {
                    position,
                    message: e.to_string(),
                })
            })
            .collect()
    }

    /// The built-in rule-set used when no template is requested.
    pub fn default_set() -> Vec<Rule> {
        vec![
            Rule::Sum,
            Rule::Tax {
                rate: BigDecimal::from(19) / BigDecimal::from(100),
            },
            Rule::Total,
        ]
    }

    pub(crate) fn apply(&self, context: &mut InvoiceContext) {
        match self {
            Rule::Sum => {
                let subtotal = context
                    .items
                    .iter()
                    .fold(BigDecimal::from(0), |acc, line| acc + &line.total);
                context.subtotal = Some(money(subtotal));
            }
            Rule::Tax { rate } => {
                let subtotal = context.subtotal.clone().unwrap_or_else(|| BigDecimal::from(0));
                context.tax = Some(TaxLine {
                    rate: rate.clone(),
                    amount: money(subtotal * rate),
                });
            }
            Rule::Total => {
                let subtotal = context.subtotal.clone().unwrap_or_else(|| BigDecimal::from(0));
                let tax = context
                    .tax
                    .as_ref()
                    .map(|t| t.amount.clone())
                    .unwrap_or_else(|| BigDecimal::from(0));
                context.total = Some(money(subtotal + tax));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_rule_name_fails_at_parse_time() {
        let values = vec![json!({"rule": "sum"}), json!({"rule": "discount"})];

        let err = Rule::parse_all(&values).expect_err("should reject unknown rule");

        assert_eq!(err.position, 1);
        assert!(err.message.contains("discount"), "message: {}", err.message);
    }

    #[test]
    fn tax_rule_without_rate_fails_at_parse_time() {
        let err = Rule::parse_all(&[json!({"rule": "tax"})]).expect_err("rate is required");
        assert_eq!(err.position, 0);
    }

    #[test]
    fn non_object_rule_fails_at_parse_time() {
        assert!(Rule::parse_all(&[json!("sum")]).is_err());
    }

    #[test]
    fn empty_rule_set_parses_to_no_rules() {
        assert_eq!(Rule::parse_all(&[]).expect("empty is valid"), vec![]);
    }

    #[test]
    fn rules_round_trip_through_json() {
        let rules = Rule::default_set();
        let values: Vec<serde_json::Value> = rules
            .iter()
            .map(|r| serde_json::to_value(r).expect("serializable"))
            .collect();
        assert_eq!(Rule::parse_all(&values).expect("parse back"), rules);
    }
}
