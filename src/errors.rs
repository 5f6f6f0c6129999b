use http::StatusCode;
use thiserror::Error;
use worker::{Error as WorkerError, Response};

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Worker(_) | AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short machine-readable error code for JSON bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Worker(_) => "worker_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Configuration(_) => "configuration_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn to_response(&self) -> worker::Result<Response> {
        let body = serde_json::json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        Ok(Response::from_json(&body)?.with_status(self.status_code().as_u16()))
    }
}

impl From<AppError> for WorkerError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Worker(e) => e,
            other => WorkerError::RustError(other.to_string()),
        }
    }
}

/// Faults reported by the external object-storage service.
///
/// These are expected failures. The asset locator folds them into an
/// error-status `RetrievalResult` and never lets them propagate further.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalFailure {
    #[error("Object '{path}' does not exist.")]
    NotFound { path: String },
    #[error("User does not have permission to access '{path}'.")]
    PermissionDenied { path: String },
    #[error("{0}")]
    Network(String),
    #[error("Storage service responded with status {status}: {message}")]
    ServiceError { status: u16, message: String },
    #[error("The object '{path}' has no download URL.")]
    NoDownloadUrl { path: String },
}

/// Defects surfacing through the asset locator itself.
///
/// Unlike `RetrievalFailure`, these mean the locator could not uphold its
/// own contract. The playback controller maps them to the critical error
/// state and discards any partial data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnexpectedFailure {
    #[error("storage returned an invalid download URL '{url}': {reason}")]
    InvalidDownloadUrl { url: String, reason: String },
    #[error("{0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(AppError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn configuration_error_is_a_server_error() {
        let err = AppError::Configuration("missing bucket".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "configuration_error");
    }

    #[test]
    fn not_found_failure_names_the_path() {
        let failure = RetrievalFailure::NotFound {
            path: "videos/acme.mp4".into(),
        };
        assert_eq!(failure.to_string(), "Object 'videos/acme.mp4' does not exist.");
    }
}
