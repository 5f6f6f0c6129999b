//! # Media Handler
//!
//! Streams objects from the R2 bucket for links issued by the R2 storage
//! backend. A link is only honoured while its signature matches and its
//! expiry has not passed.

use chrono::Utc;
use worker::*;

use crate::config::{Config, StorageBackend};
use crate::constants::STORAGE_BUCKET_NAME;
use crate::errors::{AppError, AppResult};
use crate::log_data;
use crate::logging::Logger;
use crate::middleware::ValidationMiddleware;
use crate::signing;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub async fn serve_media(req: Request, env: &Env, config: &Config, logger: &Logger) -> AppResult<Response> {
    if config.storage_backend != StorageBackend::R2 {
        return Err(AppError::NotFound("media is not served by this deployment".to_string()));
    }

    let url = req.url()?;
    let query = ValidationMiddleware::validate_media_query(&url)?;

    let secret = signing::signing_secret(env)?;
    let now = Utc::now().timestamp();
    if let Err(e) = signing::verify(&secret, &query.path, query.expires, &query.signature, now) {
        logger.warn(
            "Media link refused",
            log_data!("path" => query.path, "reason" => e.to_string()),
        );
        return Err(AppError::Forbidden(e.to_string()));
    }

    let bucket = env.bucket(STORAGE_BUCKET_NAME)?;
    let object = bucket
        .get(query.path.as_str())
        .execute()
        .await?
        .ok_or_else(|| AppError::NotFound(format!("object '{}'", query.path)))?;

    let content_type = object
        .http_metadata()
        .content_type
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    let body = object
        .body()
        .ok_or_else(|| AppError::Internal(format!("object '{}' has no body", query.path)))?;

    let headers = Headers::new();
    headers.set("Content-Type", &content_type)?;
    let max_age = (query.expires - now).max(0);
    headers.set("Cache-Control", &format!("private, max-age={}", max_age))?;

    logger.info("Streaming media", log_data!("path" => query.path));
    Ok(Response::from_stream(body.stream()?)?.with_headers(headers))
}
