pub mod context;
pub mod rules;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, Utc};

use context::{InvoiceContext, InvoiceHeader, InvoiceLine, InvoicedItem};
use rules::Rule;

/// Monetary amounts are kept at two decimals, rounded half-up.
pub(crate) const MONEY_SCALE: i64 = 2;

pub(crate) fn money(value: BigDecimal) -> BigDecimal {
    value.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
}

/// Applies an ordered rule-set to a numbered, timestamped list of invoiced
/// items. Stateless between invocations; every call builds a fresh context.
pub struct InvoicingEngine {
    rules: Vec<Rule>,
}

impl InvoicingEngine {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn process(
        &self,
        number: u32,
        timestamp: DateTime<Utc>,
        items: &[InvoicedItem],
    ) -> InvoiceContext {
        let lines = items
            .iter()
            .map(|item| InvoiceLine {
                description: item.description.clone(),
                quantity: item.quantity.clone(),
                unit_price: item.unit_price.clone(),
                total: money(&item.quantity * &item.unit_price),
            })
            .collect();

        let mut context = InvoiceContext {
            header: InvoiceHeader { number, timestamp },
            items: lines,
            subtotal: None,
            tax: None,
            total: None,
        };
        for rule in &self.rules {
            rule.apply(&mut context);
        }
        context
    }
}
