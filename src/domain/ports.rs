use std::path::Path;

use super::errors::{MailError, RenderError, RepositoryError};
use super::template::Template;
use crate::engine::context::InvoiceContext;

/// Store for named rule-sets. Reads may run concurrently; `create` is the
/// only mutation.
pub trait TemplateRepository: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<Template>, RepositoryError>;
    fn create(&self, template: Template) -> Result<Template, RepositoryError>;
    fn get_by_key(&self, name: &str) -> Result<Option<Template>, RepositoryError>;
}

/// Turns a computed invoice context into a PDF file at `path`.
pub trait InvoiceRenderer: Send + Sync + 'static {
    fn render(&self, context: &InvoiceContext, path: &Path) -> Result<(), RenderError>;
}

/// Delivers a generated invoice to a recipient.
pub trait Mailer: Send + Sync + 'static {
    fn send_invoice(
        &self,
        to: &str,
        invoice_number: &str,
        seller_name: &str,
        pdf_path: &Path,
    ) -> Result<(), MailError>;
}
