//! # Application Constants
//!
//! Application-wide constants for the delivery service. The naming and
//! fallback values here are part of the storage layout contract: videos are
//! stored as `videos/{identity}.mp4` and the bucket content is produced by
//! tooling that relies on these exact strings.
//!
//! ## Binding Names
//!
//! Constants for Cloudflare Worker bindings that must match wrangler.toml configuration.

/// Standard KV configuration binding name
pub const STORAGE_CONFIG_KV_NAME: &str = "STORAGE_CONFIG";

/// Standard R2 bucket binding name
pub const STORAGE_BUCKET_NAME: &str = "STORAGE_BUCKET";

/// Worker secret holding the HMAC key for signed media URLs
pub const MEDIA_SIGNING_SECRET_NAME: &str = "MEDIA_SIGNING_SECRET";

/// Query parameter carrying the identity token
pub const DEFAULT_IDENTITY_PARAM: &str = "vid";

/// Identity used when the request carries no usable token
pub const FALLBACK_IDENTITY: &str = "default-outreach";

/// Display name used when the request carries no usable token
pub const FALLBACK_COMPANY_NAME: &str = "[Company Name]";

/// Folder prefix for outreach videos
pub const VIDEO_FOLDER: &str = "videos";

/// File extension for outreach videos
pub const VIDEO_EXTENSION: &str = "mp4";

/// Longest identity token accepted from a request
pub const MAX_IDENTITY_TOKEN_LEN: usize = 128;

/// Default Firebase Storage REST endpoint
pub const DEFAULT_FIREBASE_ENDPOINT: &str = "https://firebasestorage.googleapis.com";

/// Default storage path of the brand logo
pub const DEFAULT_BRAND_LOGO_PATH: &str = "logos/brand-logo.png";

/// Default lifetime of issued download URLs (1 hour)
pub const DEFAULT_DOWNLOAD_URL_TTL_SECONDS: u64 = 3_600;

/// Route for worker-served media
pub const MEDIA_ROUTE: &str = "/media";

/// Session messages shown by the presentation layer
pub const MSG_INITIALIZING: &str = "Initializing playback engine...";
pub const MSG_STREAM_READY: &str = "Stream ready.";
pub const MSG_RETRIEVAL_FALLBACK: &str = "Failed to retrieve video source.";
pub const MSG_CRITICAL: &str = "A critical error occurred during playback initialization.";

/// Message used when a storage fault carries no description
pub const MSG_UNKNOWN_RETRIEVAL_ERROR: &str = "Unknown storage retrieval error.";

/// CORS header for allowed origins
pub const CORS_ALLOW_ORIGIN: &str = "*";

/// CORS header for allowed methods
pub const CORS_ALLOW_METHODS: &str = "GET, OPTIONS";

/// CORS header for allowed headers
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";
