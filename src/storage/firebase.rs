//! Firebase Storage over its REST API.
//!
//! Object metadata lives at `{endpoint}/v0/b/{bucket}/o/{path}`, with the
//! whole object path packed into one percent-encoded segment. A download URL
//! is the same address with `alt=media` and one of the object's download
//! tokens.

use async_trait::async_trait;
use serde::Deserialize;
use worker::{Fetch, Url};

use super::{StorageReference, StorageService};
use crate::errors::{AppError, AppResult, RetrievalFailure};

/// Subset of the object metadata returned by Firebase Storage.
#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    /// Comma-separated list; absent when no token has been minted.
    #[serde(rename = "downloadTokens")]
    download_tokens: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

pub struct FirebaseStorage {
    endpoint: Url,
    bucket: String,
}

impl FirebaseStorage {
    pub fn new(endpoint: &str, bucket: &str) -> AppResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            AppError::Configuration(format!("invalid firebase_endpoint '{}': {}", endpoint, e))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(AppError::Configuration(format!(
                "firebase_endpoint '{}' cannot be a base URL",
                endpoint
            )));
        }
        Ok(Self {
            endpoint,
            bucket: bucket.to_string(),
        })
    }

    fn object_url(&self, reference: &StorageReference) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v0", "b", reference.bucket.as_str(), "o", reference.path.as_str()]);
        }
        url
    }
}

fn download_url_from_metadata(object_url: &Url, metadata: &ObjectMetadata) -> Option<String> {
    let token = metadata
        .download_tokens
        .as_deref()?
        .split(',')
        .map(str::trim)
        .find(|token| !token.is_empty())?;

    let mut url = object_url.clone();
    url.query_pairs_mut()
        .append_pair("alt", "media")
        .append_pair("token", token);
    Some(url.to_string())
}

fn failure_for_status(status: u16, path: &str, body: &str) -> RetrievalFailure {
    match status {
        404 => RetrievalFailure::NotFound {
            path: path.to_string(),
        },
        401 | 403 => RetrievalFailure::PermissionDenied {
            path: path.to_string(),
        },
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| body.trim().to_string());
            RetrievalFailure::ServiceError { status, message }
        }
    }
}

#[async_trait(?Send)]
impl StorageService for FirebaseStorage {
    fn reference(&self, path: &str) -> StorageReference {
        StorageReference {
            bucket: self.bucket.clone(),
            path: path.to_string(),
        }
    }

    async fn download_url(&self, reference: &StorageReference) -> Result<String, RetrievalFailure> {
        let object_url = self.object_url(reference);

        let mut response = Fetch::Url(object_url.clone())
            .send()
            .await
            .map_err(|e| RetrievalFailure::Network(e.to_string()))?;

        let status = response.status_code();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(failure_for_status(status, &reference.path, &body));
        }

        let metadata: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| RetrievalFailure::ServiceError {
                status,
                message: format!("unreadable object metadata: {}", e),
            })?;

        download_url_from_metadata(&object_url, &metadata).ok_or_else(|| {
            RetrievalFailure::NoDownloadUrl {
                path: reference.path.clone(),
            }
        })
    }

    fn public_url(&self, reference: &StorageReference) -> Option<String> {
        let mut url = self.object_url(reference);
        url.query_pairs_mut().append_pair("alt", "media");
        Some(url.to_string())
    }
}
