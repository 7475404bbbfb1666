use thiserror::Error;

/// Failures of the template store. A missing template is not an error;
/// `get_by_key` signals it with `Ok(None)`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("template '{0}' already exists")]
    Duplicate(String),
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not write invoice file: {0}")]
    Io(#[from] std::io::Error),
    #[error("pdf generation failed: {0}")]
    Pdf(String),
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail settings are incomplete: {0}")]
    Config(String),
    #[error("could not render mail body: {0}")]
    Body(String),
    #[error("could not compose message: {0}")]
    Compose(String),
    #[error("smtp transport failed: {0}")]
    Transport(String),
    #[error("could not read invoice attachment: {0}")]
    Attachment(#[from] std::io::Error),
}
