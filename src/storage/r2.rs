//! R2 bucket binding with worker-signed media links.
//!
//! R2 bindings cannot mint presigned URLs, so this backend checks that the
//! object exists and hands out a `/media` link on this worker that carries an
//! expiry and an HMAC signature. The media handler verifies the link before
//! streaming the object.

use async_trait::async_trait;
use chrono::Utc;
use worker::{Bucket, Url};

use super::{StorageReference, StorageService};
use crate::constants::MEDIA_ROUTE;
use crate::errors::{AppError, AppResult, RetrievalFailure};
use crate::signing;

pub struct R2Storage {
    bucket: Bucket,
    bucket_name: String,
    secret: Vec<u8>,
    base_url: Url,
    ttl_seconds: u64,
}

impl R2Storage {
    pub fn new(
        bucket: Bucket,
        bucket_name: &str,
        secret: Vec<u8>,
        base_url: &str,
        ttl_seconds: u64,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::Configuration(format!("invalid media_base_url '{}': {}", base_url, e))
        })?;
        Ok(Self {
            bucket,
            bucket_name: bucket_name.to_string(),
            secret,
            base_url,
            ttl_seconds,
        })
    }
}

/// Builds `{base}/media?path=…&expires=…&sig=…`. `base_url` is an origin;
/// `Config::validate` rejects one that carries a path.
pub fn signed_media_url(
    base_url: &Url,
    secret: &[u8],
    path: &str,
    expires: i64,
) -> Result<String, signing::SignatureError> {
    let signature = signing::sign(secret, path, expires)?;
    let mut url = base_url.clone();
    url.set_path(MEDIA_ROUTE);
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair("path", path)
        .append_pair("expires", &expires.to_string())
        .append_pair("sig", &signature);
    Ok(url.to_string())
}

#[async_trait(?Send)]
impl StorageService for R2Storage {
    fn reference(&self, path: &str) -> StorageReference {
        StorageReference {
            bucket: self.bucket_name.clone(),
            path: path.to_string(),
        }
    }

    async fn download_url(&self, reference: &StorageReference) -> Result<String, RetrievalFailure> {
        let object = self
            .bucket
            .head(reference.path.as_str())
            .await
            .map_err(|e| RetrievalFailure::Network(e.to_string()))?;

        if object.is_none() {
            return Err(RetrievalFailure::NotFound {
                path: reference.path.clone(),
            });
        }

        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        let expires = Utc::now().timestamp().saturating_add(ttl);
        signed_media_url(&self.base_url, &self.secret, &reference.path, expires).map_err(|e| {
            RetrievalFailure::ServiceError {
                status: 500,
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_url_round_trips_through_query() {
        let base = Url::parse("https://delivery.example.com").unwrap();
        let url = signed_media_url(&base, b"secret", "videos/acme.mp4", 1_700_000_000).unwrap();
        let parsed = Url::parse(&url).unwrap();

        assert_eq!(parsed.path(), "/media");
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("path".to_string(), "videos/acme.mp4".to_string()));
        assert_eq!(pairs[1], ("expires".to_string(), "1700000000".to_string()));
        assert_eq!(
            signing::verify(b"secret", "videos/acme.mp4", 1_700_000_000, &pairs[2].1, 0),
            Ok(())
        );
    }
}
