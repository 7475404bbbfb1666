pub mod invoice;
pub mod templates;

use crate::errors::AppError;

/// An exhausted/poisoned blocking pool is an internal failure, same as in
/// any other actix handler.
pub(crate) fn blocking_error(e: actix_web::error::BlockingError) -> AppError {
    AppError::Internal(e.to_string())
}
