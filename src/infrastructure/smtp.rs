use std::path::Path;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tera::Tera;

use crate::config::MailConfig;
use crate::domain::errors::MailError;
use crate::domain::ports::Mailer;

/// Sends generated invoices over SMTP with a Tera-rendered HTML body and
/// the PDF attached. Templates are loaded once at construction.
pub struct SmtpMailer {
    config: MailConfig,
    templates: Tera,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let glob = format!("{}/**/*.html", config.templates_dir);
        let templates = Tera::new(&glob).map_err(|e| MailError::Body(e.to_string()))?;
        Ok(Self { config, templates })
    }

    fn sender(&self) -> Result<&str, MailError> {
        self.config
            .sender_email
            .as_deref()
            .ok_or_else(|| MailError::Config("INVOICE_UTILS_SENDER_EMAIL is not set".to_string()))
    }

    fn render_body(&self, invoice_number: &str, seller_name: &str) -> Result<String, MailError> {
        let mut context = tera::Context::new();
        context.insert("sender_email", self.sender()?);
        context.insert("invoice_id", invoice_number);
        context.insert("sender_name", seller_name);
        self.templates
            .render(&self.config.body_template_name, &context)
            .map_err(|e| MailError::Body(e.to_string()))
    }

    fn compose(
        &self,
        to: &str,
        invoice_number: &str,
        seller_name: &str,
        pdf_path: &Path,
    ) -> Result<Message, MailError> {
        let sender: Mailbox = self
            .sender()?
            .parse()
            .map_err(|e| MailError::Compose(format!("invalid sender address: {e}")))?;
        let recipient: Mailbox = to
            .parse()
            .map_err(|e| MailError::Compose(format!("invalid recipient address: {e}")))?;

        let body = self.render_body(invoice_number, seller_name)?;

        let file_name = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "invoice.pdf".to_string());
        let pdf_bytes = std::fs::read(pdf_path)?;
        let content_type = ContentType::parse("application/pdf")
            .map_err(|e| MailError::Compose(e.to_string()))?;

        Message::builder()
            .from(sender)
            .to(recipient)
            .subject(&self.config.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(body))
                    .singlepart(Attachment::new(file_name).body(pdf_bytes, content_type)),
            )
            .map_err(|e| MailError::Compose(e.to_string()))
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        let mut builder = if self.config.smtp_tls {
            SmtpTransport::starttls_relay(&self.config.host)
                .map_err(|e| MailError::Transport(e.to_string()))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.host)
        };
        builder = builder.port(self.config.port);
        if let (Some(user), Some(password)) =
            (&self.config.login_user, &self.config.login_password)
        {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }
        Ok(builder.build())
    }
}

impl Mailer for SmtpMailer {
    fn send_invoice(
        &self,
        to: &str,
        invoice_number: &str,
        seller_name: &str,
        pdf_path: &Path,
    ) -> Result<(), MailError> {
        let message = self.compose(to, invoice_number, seller_name, pdf_path)?;
        self.transport()?
            .send(&message)
            .map_err(|e| MailError::Transport(e.to_string()))?;
        log::info!("invoice was sent to {}", to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config_with_templates(dir: &Path) -> MailConfig {
        MailConfig {
            sender_email: Some("billing@example.com".to_string()),
            templates_dir: dir.to_string_lossy().into_owned(),
            body_template_name: "body.html".to_string(),
            ..MailConfig::default()
        }
    }

    fn write_template(dir: &Path) {
        let mut f = std::fs::File::create(dir.join("body.html")).expect("create template");
        writeln!(
            f,
            "<p>Invoice {{{{ invoice_id }}}} from {{{{ sender_name }}}} ({{{{ sender_email }}}})</p>"
        )
        .expect("write template");
    }

    #[test]
    fn body_renders_with_invoice_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_template(dir.path());
        let mailer = SmtpMailer::new(config_with_templates(dir.path())).expect("mailer");

        let body = mailer.render_body("42", "ACME Corp").expect("render failed");

        assert!(body.contains("Invoice 42"));
        assert!(body.contains("ACME Corp"));
        assert!(body.contains("billing@example.com"));
    }

    #[test]
    fn missing_sender_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_template(dir.path());
        let mut config = config_with_templates(dir.path());
        config.sender_email = None;
        let mailer = SmtpMailer::new(config).expect("mailer");

        let err = mailer.render_body("42", "ACME Corp").expect_err("no sender");
        assert!(matches!(err, MailError::Config(_)));
    }

    #[test]
    fn missing_body_template_is_a_body_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mailer = SmtpMailer::new(config_with_templates(dir.path())).expect("mailer");

        let err = mailer.render_body("42", "ACME Corp").expect_err("no template");
        assert!(matches!(err, MailError::Body(_)));
    }

    #[test]
    fn composed_message_carries_subject_and_attachment() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_template(dir.path());
        let pdf_path = dir.path().join("20240315-0042-invoice.pdf");
        std::fs::write(&pdf_path, b"%PDF-1.4 fake").expect("write pdf");
        let mailer = SmtpMailer::new(config_with_templates(dir.path())).expect("mailer");

        let message = mailer
            .compose("client@example.com", "42", "ACME Corp", &pdf_path)
            .expect("compose failed");

        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();
        assert!(raw.contains("Invoice generated with invoice-utils"));
        assert!(raw.contains("20240315-0042-invoice.pdf"));
        assert!(raw.contains("client@example.com"));
    }

    #[test]
    fn invalid_recipient_is_a_compose_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_template(dir.path());
        let pdf_path = dir.path().join("x.pdf");
        std::fs::write(&pdf_path, b"%PDF").expect("write pdf");
        let mailer = SmtpMailer::new(config_with_templates(dir.path())).expect("mailer");

        let err = mailer
            .compose("not-an-address", "42", "ACME Corp", &pdf_path)
            .expect_err("bad recipient");
        assert!(matches!(err, MailError::Compose(_)));
    }
}
