use std::env;

pub const DEFAULT_MAIL_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_MAIL_PORT: u16 = 587;
pub const DEFAULT_MAIL_SUBJECT: &str = "Invoice generated with invoice-utils";
pub const DEFAULT_BODY_TEMPLATE_NAME: &str = "default_template.html";
pub const DEFAULT_BODY_TEMPLATE_DIRECTORY: &str = "email_templates";

/// Mail settings, read from the environment once at process start and
/// handed to the mailer explicitly. Nothing reads these variables after
/// startup.
#[derive(Debug, Clone, PartialEq)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub subject: String,
    pub login_user: Option<String>,
    pub login_password: Option<String>,
    pub sender_email: Option<String>,
    pub smtp_tls: bool,
    pub body_template_name: String,
    pub templates_dir: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MAIL_HOST.to_string(),
            port: DEFAULT_MAIL_PORT,
            subject: DEFAULT_MAIL_SUBJECT.to_string(),
            login_user: None,
            login_password: None,
            sender_email: None,
            smtp_tls: false,
            body_template_name: DEFAULT_BODY_TEMPLATE_NAME.to_string(),
            templates_dir: DEFAULT_BODY_TEMPLATE_DIRECTORY.to_string(),
        }
    }
}

impl MailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("INVOICE_UTILS_MAIL_HOST", defaults.host),
            port: env::var("INVOICE_UTILS_MAIL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            subject: env_or("INVOICE_UTILS_MAIL_SUBJECT", defaults.subject),
            login_user: env::var("INVOICE_UTILS_MAIL_LOGIN_USER").ok(),
            login_password: env::var("INVOICE_UTILS_MAIL_LOGIN_PASSWORD").ok(),
            sender_email: env::var("INVOICE_UTILS_SENDER_EMAIL").ok(),
            smtp_tls: env::var("INVOICE_UTILS_SMTP_TLS")
                .map(|v| str_to_bool(&v))
                .unwrap_or(false),
            body_template_name: env_or(
                "INVOICE_UTILS_BODY_TEMPLATE_NAME",
                defaults.body_template_name,
            ),
            templates_dir: env_or("INVOICE_UTILS_TEMPLATES_DIR", defaults.templates_dir),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn str_to_bool(arg: &str) -> bool {
    matches!(arg, "True" | "1" | "y" | "true" | "yes" | "Yes" | "Y")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = MailConfig::default();
        assert_eq!(cfg.host, "smtp.gmail.com");
        assert_eq!(cfg.port, 587);
        assert_eq!(cfg.subject, "Invoice generated with invoice-utils");
        assert!(cfg.login_user.is_none());
        assert!(cfg.login_password.is_none());
        assert!(cfg.sender_email.is_none());
        assert!(!cfg.smtp_tls);
        assert_eq!(cfg.body_template_name, "default_template.html");
        assert_eq!(cfg.templates_dir, "email_templates");
    }

    #[test]
    fn truthy_strings_enable_tls() {
        for v in ["True", "1", "y", "true", "yes", "Yes", "Y"] {
            assert!(str_to_bool(v), "{v} should be truthy");
        }
    }

    #[test]
    fn other_strings_disable_tls() {
        for v in ["False", "0", "no", "", "TRUE", "on"] {
            assert!(!str_to_bool(v), "{v} should be falsy");
        }
    }
}
