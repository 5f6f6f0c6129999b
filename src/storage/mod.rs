//! # Object Storage Boundary
//!
//! The external service that holds the videos sits behind [`StorageService`].
//! A service builds a [`StorageReference`] for a path and issues a
//! time-limited download URL for it, or reports a [`RetrievalFailure`].
//!
//! ## Backends
//!
//! - **Firebase**: Firebase Storage REST API via `worker::Fetch`
//! - **R2**: the worker's own bucket binding, with URLs signed by this worker

use async_trait::async_trait;
use worker::{Env, Url};

use crate::config::{Config, StorageBackend};
use crate::constants::STORAGE_BUCKET_NAME;
use crate::errors::{AppResult, RetrievalFailure};
use crate::signing::signing_secret;

pub mod firebase;
pub mod r2;

pub use firebase::FirebaseStorage;
pub use r2::R2Storage;

/// Handle to one object in a bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageReference {
    pub bucket: String,
    pub path: String,
}

#[async_trait(?Send)]
pub trait StorageService {
    fn reference(&self, path: &str) -> StorageReference;

    /// Issues a fully-qualified, time-limited URL for the referenced object.
    async fn download_url(&self, reference: &StorageReference) -> Result<String, RetrievalFailure>;

    /// Unauthenticated URL for best-effort previews, if the backend has one.
    fn public_url(&self, _reference: &StorageReference) -> Option<String> {
        None
    }
}

/// Builds the storage service selected by `config`.
///
/// `request_url` supplies the public origin for signed media links when
/// `media_base_url` is not configured.
pub fn storage_for(
    config: &Config,
    env: &Env,
    request_url: &Url,
) -> AppResult<Box<dyn StorageService>> {
    match config.storage_backend {
        StorageBackend::Firebase => Ok(Box::new(FirebaseStorage::new(
            &config.firebase_endpoint,
            &config.firebase_bucket,
        )?)),
        StorageBackend::R2 => {
            let bucket = env.bucket(STORAGE_BUCKET_NAME)?;
            let secret = signing_secret(env)?;
            let base_url = match &config.media_base_url {
                Some(base) => base.clone(),
                None => request_url.origin().ascii_serialization(),
            };
            Ok(Box::new(R2Storage::new(
                bucket,
                STORAGE_BUCKET_NAME,
                secret,
                &base_url,
                config.download_url_ttl_seconds,
            )?))
        }
    }
}
