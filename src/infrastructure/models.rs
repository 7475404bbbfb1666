use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::template::Template;
use crate::schema::templates;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = templates)]
#[diesel(primary_key(name))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TemplateRow {
    pub name: String,
    pub rules: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = templates)]
pub struct NewTemplateRow {
    pub name: String,
    pub rules: Value,
}

impl TemplateRow {
    /// Stored rules are a JSON array; anything else counts as an empty
    /// rule-set rather than a read failure.
    pub fn into_template(self) -> Template {
        let rules = match self.rules {
            Value::Array(values) => values,
            _ => Vec::new(),
        };
        Template::new(self.name, rules)
    }
}

impl From<&Template> for NewTemplateRow {
    fn from(template: &Template) -> Self {
        Self {
            name: template.name.clone(),
            rules: Value::Array(template.rules.clone()),
        }
    }
}
