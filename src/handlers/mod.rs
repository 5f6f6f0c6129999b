//! # Handlers Module
//!
//! HTTP request handlers for the delivery service. Every handler returns an
//! `AppResult<Response>`; [`respond`] turns failures into structured JSON
//! errors and applies CORS headers on the way out.

use worker::*;

use crate::errors::AppResult;
use crate::log_data;
use crate::logging::Logger;
use crate::middleware::CorsMiddleware;

pub mod media;
pub mod session;

/// Converts a handler result into the final response.
pub fn respond(result: AppResult<Response>, logger: &Logger) -> Result<Response> {
    match result {
        Ok(response) => Ok(CorsMiddleware::apply_headers(response)),
        Err(app_error) => {
            let status = app_error.status_code();
            if status.is_server_error() {
                logger.error(
                    "Request failed",
                    log_data!("status" => status.as_u16(), "error" => app_error.to_string()),
                );
            } else {
                logger.warn(
                    "Request rejected",
                    log_data!("status" => status.as_u16(), "error" => app_error.to_string()),
                );
            }
            match app_error.to_response() {
                Ok(response) => Ok(CorsMiddleware::apply_headers(response)),
                Err(_) => Response::error("Internal Server Error", 500)
                    .map(CorsMiddleware::apply_headers),
            }
        }
    }
}

/// Provides a health check endpoint for monitoring and load balancer health checks.
///
/// # Response Format
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "outreach-delivery-cf-workers",
///   "timestamp": "2024-01-15T10:30:00Z"
/// }
/// ```
pub async fn handle_health_check(_req: Request, _env: Env) -> Result<Response> {
    Response::from_json(&serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
    .map(CorsMiddleware::apply_headers)
}

/// Handles requests to unmatched routes with a 404 Not Found response.
pub async fn handle_not_found(_req: Request, _env: Env) -> Result<Response> {
    Response::error("Not Found", 404).map(CorsMiddleware::apply_headers)
}
