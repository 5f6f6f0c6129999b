//! # Configuration Management
//!
//! Configuration is stored in Cloudflare KV storage under the `config` key
//! and loaded at runtime, with defaults for every setting.
//!
//! ## Configuration Options
//!
//! - `identity_param`: Query parameter carrying the identity token (default: `vid`)
//! - `storage_backend`: `firebase` or `r2`
//! - `firebase_bucket`: Firebase Storage bucket holding the videos
//! - `firebase_endpoint`: Firebase Storage REST endpoint
//! - `brand_logo_path`: Storage path of the brand logo
//! - `download_url_ttl_seconds`: Lifetime of worker-signed media URLs
//! - `media_base_url`: Public origin used in signed media URLs (default: request origin).
//!   Must be a bare origin; the worker routes `/media` at the root.
//!
//! ## Example
//!
//! ```rust
//! let kv = env.kv(STORAGE_CONFIG_KV_NAME)?;
//! let config = Config::load(&kv).await?;
//! println!("Serving videos from {:?}", config.storage_backend);
//! ```

use crate::constants::{
    DEFAULT_BRAND_LOGO_PATH, DEFAULT_DOWNLOAD_URL_TTL_SECONDS, DEFAULT_FIREBASE_ENDPOINT,
    DEFAULT_IDENTITY_PARAM,
};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use worker::kv::KvStore;
use worker::{console_log, Result, Url};

/// Object storage service that issues download URLs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Firebase Storage over its REST API.
    #[default]
    Firebase,
    /// The worker's own R2 bucket binding, served through signed `/media` URLs.
    R2,
}

/// Configuration structure for the delivery service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub identity_param: String,

    pub storage_backend: StorageBackend,

    /// Bucket name, e.g. `my-project.firebasestorage.app`.
    pub firebase_bucket: String,

    pub firebase_endpoint: String,

    pub brand_logo_path: String,

    /// Only applies to the R2 backend; Firebase tokens are managed by Firebase.
    pub download_url_ttl_seconds: u64,

    pub media_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identity_param: DEFAULT_IDENTITY_PARAM.to_string(),
            storage_backend: StorageBackend::default(),
            firebase_bucket: String::new(),
            firebase_endpoint: DEFAULT_FIREBASE_ENDPOINT.to_string(),
            brand_logo_path: DEFAULT_BRAND_LOGO_PATH.to_string(),
            download_url_ttl_seconds: DEFAULT_DOWNLOAD_URL_TTL_SECONDS,
            media_base_url: None,
        }
    }
}

impl Config {
    /// Loads configuration from KV storage with fallback to defaults.
    ///
    /// # Configuration Format
    ///
    /// ```json
    /// {
    ///   "storage_backend": "firebase",
    ///   "firebase_bucket": "my-project.firebasestorage.app",
    ///   "brand_logo_path": "logos/brand-logo.png"
    /// }
    /// ```
    ///
    /// Missing keys take their default values. KV access errors and invalid
    /// JSON are propagated.
    pub async fn load(kv: &KvStore) -> Result<Self> {
        match kv.get("config").json::<Config>().await? {
            Some(config) => {
                console_log!("Configuration loaded from KV storage");
                Ok(config)
            }
            None => {
                console_log!("Config not found in KV, using default");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.identity_param.is_empty() {
            return Err(AppError::Configuration(
                "identity_param must not be empty".to_string(),
            ));
        }
        if self.storage_backend == StorageBackend::Firebase && self.firebase_bucket.trim().is_empty()
        {
            return Err(AppError::Configuration(
                "firebase_bucket is required for the firebase backend".to_string(),
            ));
        }
        if self.download_url_ttl_seconds == 0 {
            return Err(AppError::Configuration(
                "download_url_ttl_seconds must be positive".to_string(),
            ));
        }
        if let Some(base) = &self.media_base_url {
            validate_media_base_url(base)?;
        }
        Ok(())
    }
}

fn validate_media_base_url(base: &str) -> AppResult<()> {
    let url = Url::parse(base).map_err(|e| {
        AppError::Configuration(format!("invalid media_base_url '{}': {}", base, e))
    })?;
    if !matches!(url.scheme(), "https" | "http") {
        return Err(AppError::Configuration(format!(
            "media_base_url '{}' must use http or https",
            base
        )));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(AppError::Configuration(format!(
            "media_base_url '{}' must be an origin without a path",
            base
        )));
    }
    Ok(())
}
