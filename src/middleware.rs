//! # Middleware Components
//!
//! Cross-cutting request/response processing: CORS handling and validation
//! of request parameters.
//!
//! ## Usage Examples
//!
//! ```rust
//! // Handle CORS preflight
//! if req.method() == Method::Options {
//!     return CorsMiddleware::handle_preflight();
//! }
//!
//! // Validate a signed media link
//! let query = ValidationMiddleware::validate_media_query(&req.url()?)?;
//! ```

use crate::errors::{AppError, AppResult};
use crate::utils::cors_headers;
use worker::*;

/// Middleware for handling Cross-Origin Resource Sharing (CORS) requests.
///
/// The current implementation allows all origins (`*`); the service only
/// serves read-only, link-scoped data.
pub struct CorsMiddleware;

impl CorsMiddleware {
    /// Applies CORS headers to an existing response.
    pub fn apply_headers(response: Response) -> Response {
        response.with_headers(cors_headers())
    }

    /// Handles CORS preflight requests (OPTIONS method).
    pub fn handle_preflight() -> Result<Response> {
        Ok(Response::empty()?.with_headers(cors_headers()))
    }
}

/// Parameters of a signed `/media` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    pub path: String,
    pub expires: i64,
    pub signature: String,
}

/// Middleware for validating request parameters.
pub struct ValidationMiddleware;

impl ValidationMiddleware {
    /// Extracts and validates the `path`, `expires` and `sig` parameters of a
    /// media link.
    ///
    /// # Errors
    ///
    /// - `BadRequest`: If a parameter is missing, `expires` is not an integer,
    ///   or `path` is empty, absolute or contains `..` segments
    pub fn validate_media_query(url: &Url) -> AppResult<MediaQuery> {
        let mut path = None;
        let mut expires = None;
        let mut signature = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "path" if path.is_none() => path = Some(value.into_owned()),
                "expires" if expires.is_none() => expires = Some(value.into_owned()),
                "sig" if signature.is_none() => signature = Some(value.into_owned()),
                _ => {}
            }
        }

        let path = path.ok_or_else(|| AppError::BadRequest("Missing path".to_string()))?;
        let expires = expires
            .ok_or_else(|| AppError::BadRequest("Missing expires".to_string()))?
            .parse::<i64>()
            .map_err(|_| AppError::BadRequest("expires must be a valid number".to_string()))?;
        let signature =
            signature.ok_or_else(|| AppError::BadRequest("Missing sig".to_string()))?;

        Self::validate_object_path(&path)?;

        Ok(MediaQuery {
            path,
            expires,
            signature,
        })
    }

    /// Rejects object paths that are empty, absolute or climb directories.
    pub fn validate_object_path(path: &str) -> AppResult<()> {
        if path.is_empty()
            || path.starts_with('/')
            || path.split('/').any(|segment| segment.is_empty() || segment == "..")
        {
            return Err(AppError::BadRequest(format!("Invalid object path '{}'", path)));
        }
        Ok(())
    }
}
