//! # Request Routing and Dispatch
//!
//! Pattern-based routing on HTTP method and path.
//!
//! ## Supported Routes
//!
//! - `GET /health` - Health check endpoint
//! - `GET /api/identity` - Identity resolved from the `vid` parameter
//! - `GET /api/session` - Terminal playback session state
//! - `GET /api/session/initial` - Loading state for immediate rendering
//! - `GET /api/preview` - Public preview URL for the same identity
//! - `GET /api/brand/logo` - Download URL for the brand logo
//! - `GET /api/delivery` - Identity, session and logo in one response
//! - `GET /media` - Signed media links (R2 backend)
//! - `OPTIONS *` - CORS preflight requests

use std::sync::Arc;
use worker::*;

use crate::config::Config;
use crate::constants::MEDIA_ROUTE;
use crate::handlers::{handle_health_check, handle_not_found, media, respond, session};
use crate::logging::Logger;
use crate::middleware::CorsMiddleware;
use crate::utils::generate_unique_identifier;

/// Handles incoming HTTP requests and routes them to appropriate handlers.
///
/// # Request Flow
///
/// 1. **CORS Preflight**: Handles OPTIONS requests for cross-origin support
/// 2. **Path Extraction**: Extracts URL path and HTTP method from request
/// 3. **Handler Dispatch**: Delegates to the matching handler with a
///    request-scoped logger
/// 4. **Error Handling**: Handler errors become JSON error responses; unmatched
///    routes return 404
pub async fn handle_request(req: Request, env: Env, config: Arc<Config>) -> Result<Response> {
    // Handle CORS preflight requests early to avoid unnecessary processing
    if req.method() == Method::Options {
        return CorsMiddleware::handle_preflight();
    }

    let url = req.url()?;
    let path = url.path().to_string();
    let method = req.method();
    let logger = Logger::new(generate_unique_identifier());

    logger.info(
        "Routing request",
        crate::log_data!("method" => method.to_string(), "path" => path),
    );

    let result = match (method, path.as_str()) {
        (Method::Get, "/health") => return handle_health_check(req, env).await,
        (Method::Get, "/api/identity") => session::get_identity(req, &config, &logger).await,
        (Method::Get, "/api/session") => session::get_session(req, &env, &config, &logger).await,
        (Method::Get, "/api/session/initial") => session::get_initial_state().await,
        (Method::Get, "/api/preview") => session::get_preview(req, &env, &config, &logger).await,
        (Method::Get, "/api/brand/logo") => {
            session::get_brand_logo(req, &env, &config, &logger).await
        }
        (Method::Get, "/api/delivery") => session::get_delivery(req, &env, &config, &logger).await,
        (Method::Get, p) if p == MEDIA_ROUTE => media::serve_media(req, &env, &config, &logger).await,
        _ => return handle_not_found(req, env).await,
    };

    respond(result, &logger)
}
