//! # Remote Asset Locator
//!
//! Asks the storage service for a download URL for one source descriptor and
//! normalizes the answer into a [`RetrievalResult`]. Storage faults never
//! leave this module as errors. The only error it returns is an
//! [`UnexpectedFailure`], when the storage collaborator breaks its own
//! contract.

use async_trait::async_trait;
use worker::Url;

use crate::errors::UnexpectedFailure;
use crate::log_data;
use crate::logging::Logger;
use crate::models::{RetrievalResult, SourceDescriptor};
use crate::storage::StorageService;

/// Finds a playable URL for a source descriptor.
///
/// Implementations absorb storage faults into an error [`RetrievalResult`].
/// The playback controller only depends on this trait, so tests can swap in
/// a scripted locator.
#[async_trait(?Send)]
pub trait AssetLocator {
    /// Looks up the object at `source.storage_path`.
    ///
    /// # Arguments
    ///
    /// * `source` - Where the video lives in storage
    ///
    /// # Returns
    ///
    /// * `Ok(RetrievalResult)` - A success with a download URL, or an error
    ///   result carrying the storage fault message
    /// * `Err(UnexpectedFailure)` - The storage collaborator broke its contract
    async fn locate(&self, source: &SourceDescriptor)
        -> Result<RetrievalResult, UnexpectedFailure>;
}

pub struct RemoteAssetLocator {
    storage: Box<dyn StorageService>,
    logger: Logger,
}

impl RemoteAssetLocator {
    pub fn new(storage: Box<dyn StorageService>, logger: Logger) -> Self {
        Self { storage, logger }
    }

    /// Looks up an object that is not tied to an identity, such as the brand logo.
    pub async fn locate_path(&self, path: &str) -> Result<RetrievalResult, UnexpectedFailure> {
        let source = SourceDescriptor {
            identity: String::new(),
            filename: path.rsplit('/').next().unwrap_or(path).to_string(),
            storage_path: path.to_string(),
        };
        let mut result = self.locate(&source).await?;
        if result.is_success() {
            result.identity = None;
        }
        Ok(result)
    }
}

fn ensure_fully_qualified(url: &str) -> Result<(), UnexpectedFailure> {
    let parsed = Url::parse(url).map_err(|e| UnexpectedFailure::InvalidDownloadUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "https" | "http" => Ok(()),
        scheme => Err(UnexpectedFailure::InvalidDownloadUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

#[async_trait(?Send)]
impl AssetLocator for RemoteAssetLocator {
    async fn locate(
        &self,
        source: &SourceDescriptor,
    ) -> Result<RetrievalResult, UnexpectedFailure> {
        let reference = self.storage.reference(&source.storage_path);

        match self.storage.download_url(&reference).await {
            Ok(download_url) => {
                ensure_fully_qualified(&download_url)?;
                self.logger.info(
                    "Download URL issued",
                    log_data!("storage_path" => source.storage_path, "bucket" => reference.bucket),
                );
                Ok(RetrievalResult::success(source, download_url))
            }
            Err(failure) => {
                self.logger.error(
                    "Storage retrieval failed",
                    log_data!(
                        "storage_path" => source.storage_path,
                        "bucket" => reference.bucket,
                        "error" => failure.to_string(),
                        "kind" => format!("{:?}", failure)
                    ),
                );
                Ok(RetrievalResult::from(&failure))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::RetrievalFailure;
    use crate::models::RetrievalStatus;
    use crate::source::resolve_source;
    use crate::identity::resolve_identity;
    use crate::storage::StorageReference;
    use futures::executor::block_on;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Storage double answering every lookup with a fixed outcome.
    pub(crate) struct FakeStorage {
        pub outcome: Result<String, RetrievalFailure>,
        pub calls: Rc<Cell<usize>>,
    }

    impl FakeStorage {
        pub(crate) fn answering(outcome: Result<String, RetrievalFailure>) -> Self {
            Self {
                outcome,
                calls: Rc::new(Cell::new(0)),
            }
        }
    }

    #[async_trait(?Send)]
    impl StorageService for FakeStorage {
        fn reference(&self, path: &str) -> StorageReference {
            StorageReference {
                bucket: "fake-bucket".into(),
                path: path.into(),
            }
        }

        async fn download_url(
            &self,
            _reference: &StorageReference,
        ) -> Result<String, RetrievalFailure> {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    fn locator(storage: FakeStorage) -> RemoteAssetLocator {
        RemoteAssetLocator::new(Box::new(storage), Logger::new("test"))
    }

    fn source(token: &str) -> SourceDescriptor {
        resolve_source(&resolve_identity(Some(token.to_string())))
    }

    #[test]
    fn success_carries_identity_and_path() {
        let storage = FakeStorage::answering(Ok("https://cdn.test/acme.mp4?token=t".into()));
        let calls = storage.calls.clone();
        let result = block_on(locator(storage).locate(&source("acme"))).unwrap();

        assert_eq!(result.status, RetrievalStatus::Success);
        assert_eq!(result.identity.as_deref(), Some("acme"));
        assert_eq!(result.storage_path.as_deref(), Some("videos/acme.mp4"));
        assert_eq!(result.download_url.as_deref(), Some("https://cdn.test/acme.mp4?token=t"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn storage_fault_becomes_error_result() {
        let storage = FakeStorage::answering(Err(RetrievalFailure::NotFound {
            path: "videos/acme.mp4".into(),
        }));
        let result = block_on(locator(storage).locate(&source("acme"))).unwrap();

        assert_eq!(result.status, RetrievalStatus::Error);
        assert_eq!(result.identity, None);
        assert_eq!(result.storage_path, None);
        assert_eq!(result.download_url, None);
        assert_eq!(result.message.as_deref(), Some("Object 'videos/acme.mp4' does not exist."));
    }

    #[test]
    fn network_fault_is_contained() {
        let storage = FakeStorage::answering(Err(RetrievalFailure::Network("connection reset".into())));
        let result = block_on(locator(storage).locate(&source("acme"))).unwrap();
        assert_eq!(result.message.as_deref(), Some("connection reset"));
    }

    #[test]
    fn relative_url_is_an_unexpected_failure() {
        let storage = FakeStorage::answering(Ok("/videos/acme.mp4".into()));
        let err = block_on(locator(storage).locate(&source("acme"))).unwrap_err();
        assert!(matches!(err, UnexpectedFailure::InvalidDownloadUrl { .. }));
    }

    #[test]
    fn locate_path_drops_identity() {
        let storage = FakeStorage::answering(Ok("https://cdn.test/logo.png".into()));
        let result = block_on(locator(storage).locate_path("logos/brand-logo.png")).unwrap();
        assert!(result.is_success());
        assert_eq!(result.identity, None);
        assert_eq!(result.storage_path.as_deref(), Some("logos/brand-logo.png"));
    }
}
