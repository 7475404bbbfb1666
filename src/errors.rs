use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::{MailError, RenderError, RepositoryError};
use crate::engine::rules::ConfigurationError;

/// HTTP-facing error type. Body shape follows the error family: client
/// input and mail problems report `{"message"}`, template repository
/// problems report `{"detail"}`, everything else `{"error"}`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Self-inconsistent client request, 422.
    #[error("{0}")]
    Input(String),

    /// Mail transport failure, 502. The PDF has already been written.
    #[error("There was a problem sending the email.")]
    Email(#[source] MailError),

    /// Template repository backend failure, 507. The string is the
    /// operation-specific detail exposed to the client.
    #[error("{0}")]
    Repository(&'static str),

    /// Missing template, 404.
    #[error("template not found")]
    NotFound,

    /// Template name already taken, 409.
    #[error("template '{0}' already exists")]
    Duplicate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ConfigurationError> for AppError {
    fn from(e: ConfigurationError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<MailError> for AppError {
    fn from(e: MailError) -> Self {
        AppError::Email(e)
    }
}

impl AppError {
    /// Map a repository failure to its HTTP form, logging the cause once
    /// at ERROR level with the operation name.
    pub fn from_repo(operation: &str, detail: &'static str, e: RepositoryError) -> Self {
        match e {
            RepositoryError::Duplicate(name) => AppError::Duplicate(name),
            RepositoryError::Backend(cause) => {
                log::error!("repo exception on {}: {}", operation, cause);
                AppError::Repository(detail)
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Input(message) => {
                HttpResponse::UnprocessableEntity().json(json!({ "message": message }))
            }
            AppError::Email(_) => {
                HttpResponse::BadGateway().json(json!({ "message": self.to_string() }))
            }
            AppError::Repository(detail) => HttpResponse::InsufficientStorage()
                .json(json!({ "detail": detail })),
            AppError::NotFound => {
                HttpResponse::NotFound().json(json!({ "detail": self.to_string() }))
            }
            AppError::Duplicate(_) => {
                HttpResponse::Conflict().json(json!({ "detail": self.to_string() }))
            }
            AppError::Internal(_) => HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn input_error_returns_422() {
        let resp = AppError::Input("bad".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn email_error_returns_502() {
        let err = AppError::Email(MailError::Transport("refused".to_string()));
        assert_eq!(err.error_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn repository_error_returns_507() {
        let err = AppError::Repository("error reading from template repository");
        assert_eq!(
            err.error_response().status(),
            StatusCode::INSUFFICIENT_STORAGE
        );
    }

    #[test]
    fn not_found_returns_404() {
        assert_eq!(
            AppError::NotFound.error_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn duplicate_returns_409() {
        let err = AppError::Duplicate("basic".to_string());
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("boom".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn email_error_display_hides_the_cause() {
        let err = AppError::Email(MailError::Transport("password leaked".to_string()));
        assert_eq!(err.to_string(), "There was a problem sending the email.");
    }

    #[test]
    fn backend_failure_maps_to_repository_detail() {
        let err = AppError::from_repo(
            "list",
            "error reading from template repository",
            RepositoryError::Backend("connection reset".to_string()),
        );
        assert!(matches!(err, AppError::Repository(_)));
    }

    #[test]
    fn duplicate_failure_maps_to_conflict() {
        let err = AppError::from_repo(
            "create",
            "error creating template in template repository",
            RepositoryError::Duplicate("basic".to_string()),
        );
        assert!(matches!(err, AppError::Duplicate(name) if name == "basic"));
    }
}
