use std::sync::Mutex;

use crate::domain::errors::RepositoryError;
use crate::domain::ports::TemplateRepository;
use crate::domain::template::Template;

/// In-memory template store. Serves as the test double for the repository
/// trait and as the runtime fallback when no DATABASE_URL is configured.
/// Insertion order is preserved, which is the order `list` reports.
#[derive(Default)]
pub struct InMemoryTemplateRepository {
    templates: Mutex<Vec<Template>>,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Template>>, RepositoryError> {
        self.templates
            .lock()
            .map_err(|e| RepositoryError::Backend(e.to_string()))
    }
}

impl TemplateRepository for InMemoryTemplateRepository {
    fn list(&self) -> Result<Vec<Template>, RepositoryError> {
        Ok(self.lock()?.clone())
    }

    fn create(&self, template: Template) -> Result<Template, RepositoryError> {
        let mut templates = self.lock()?;
        if templates.iter().any(|t| t.name == template.name) {
            return Err(RepositoryError::Duplicate(template.name));
        }
        templates.push(template.clone());
        Ok(template)
    }

    fn get_by_key(&self, name: &str) -> Result<Option<Template>, RepositoryError> {
        Ok(self.lock()?.iter().find(|t| t.name == name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn template(name: &str) -> Template {
        Template::new(name, vec![json!({"rule": "sum"})])
    }

    #[test]
    fn get_by_key_on_empty_repository_returns_none() {
        let repo = InMemoryTemplateRepository::new();
        assert!(repo.get_by_key("missing").expect("no error").is_none());
    }

    #[test]
    fn create_then_get_returns_the_template_unchanged() {
        let repo = InMemoryTemplateRepository::new();
        let created = repo.create(template("basic")).expect("create failed");

        let fetched = repo
            .get_by_key("basic")
            .expect("get failed")
            .expect("should exist");

        assert_eq!(fetched, created);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let repo = InMemoryTemplateRepository::new();
        repo.create(template("basic")).expect("create failed");

        let err = repo.create(template("basic")).expect_err("duplicate");
        assert!(matches!(err, RepositoryError::Duplicate(name) if name == "basic"));
    }

    #[test]
    fn list_preserves_insertion_order_and_cardinality() {
        let repo = InMemoryTemplateRepository::new();
        for name in ["zulu", "alpha", "mike"] {
            repo.create(template(name)).expect("create failed");
        }

        let listed = repo.list().expect("list failed");
        let names: Vec<&str> = listed.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
    }
}
