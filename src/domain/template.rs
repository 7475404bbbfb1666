use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A persisted, named rule-set. Rules are kept as raw JSON objects and
/// only parsed into typed rules when a rule-set is loaded into the
/// invoicing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub rules: Vec<Value>,
}

impl Template {
    pub fn new(name: impl Into<String>, rules: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }
}
