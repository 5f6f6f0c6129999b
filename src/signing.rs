//! # Signed Media URLs
//!
//! Time-limited URLs for objects served out of the R2 bucket by this worker.
//! The signature is HMAC-SHA256 over `"{path}\n{expires}"`, hex encoded.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use worker::Env;

use crate::constants::MEDIA_SIGNING_SECRET_NAME;
use crate::errors::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("malformed signature")]
    Malformed,
    #[error("signature mismatch")]
    Mismatch,
    #[error("link expired at {expires}")]
    Expired { expires: i64 },
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
    #[error("signing key is empty")]
    EmptyKey,
}

/// Reads the media signing secret from the worker environment.
///
/// Both the link issuer and the media handler go through here, so a
/// deployment with a blank secret neither issues nor honours links.
///
/// # Returns
///
/// * `AppResult<Vec<u8>>` - The key bytes, or a configuration error when the
///   secret is missing or empty
pub fn signing_secret(env: &Env) -> AppResult<Vec<u8>> {
    non_empty_secret(env.secret(MEDIA_SIGNING_SECRET_NAME)?.to_string())
}

fn non_empty_secret(value: String) -> AppResult<Vec<u8>> {
    if value.is_empty() {
        return Err(AppError::Configuration(format!(
            "{} must not be empty",
            MEDIA_SIGNING_SECRET_NAME
        )));
    }
    Ok(value.into_bytes())
}

fn mac_for(secret: &[u8], path: &str, expires: i64) -> Result<HmacSha256, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::EmptyKey);
    }
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(path.as_bytes());
    mac.update(b"\n");
    mac.update(expires.to_string().as_bytes());
    Ok(mac)
}

pub fn sign(secret: &[u8], path: &str, expires: i64) -> Result<String, SignatureError> {
    let mac = mac_for(secret, path, expires)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks `signature` for `path` and rejects links past `expires`.
pub fn verify(
    secret: &[u8],
    path: &str,
    expires: i64,
    signature: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let expected = hex::decode(signature).map_err(|_| SignatureError::Malformed)?;
    mac_for(secret, path, expires)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)?;

    if now > expires {
        return Err(SignatureError::Expired { expires });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-signing-secret";

    #[test]
    fn signed_link_verifies_until_expiry() {
        let sig = sign(SECRET, "videos/acme.mp4", 1_000).unwrap();
        assert_eq!(verify(SECRET, "videos/acme.mp4", 1_000, &sig, 999), Ok(()));
        assert_eq!(verify(SECRET, "videos/acme.mp4", 1_000, &sig, 1_000), Ok(()));
        assert_eq!(
            verify(SECRET, "videos/acme.mp4", 1_000, &sig, 1_001),
            Err(SignatureError::Expired { expires: 1_000 })
        );
    }

    #[test]
    fn signature_is_bound_to_path_and_expiry() {
        let sig = sign(SECRET, "videos/acme.mp4", 1_000).unwrap();
        assert_eq!(
            verify(SECRET, "videos/other.mp4", 1_000, &sig, 0),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify(SECRET, "videos/acme.mp4", 2_000, &sig, 0),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify(b"other-secret", "videos/acme.mp4", 1_000, &sig, 0),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn empty_key_is_refused() {
        assert_eq!(
            sign(b"", "videos/anything-in-bucket.mp4", i64::MAX),
            Err(SignatureError::EmptyKey)
        );

        // Tag computed with an empty HMAC key, as a forged link would carry.
        let mut mac = HmacSha256::new_from_slice(b"").unwrap();
        mac.update(b"videos/anything-in-bucket.mp4\n9223372036854775807");
        let forged = hex::encode(mac.finalize().into_bytes());
        assert_eq!(
            verify(b"", "videos/anything-in-bucket.mp4", i64::MAX, &forged, 0),
            Err(SignatureError::EmptyKey)
        );
    }

    #[test]
    fn blank_secret_is_a_configuration_error() {
        let err = non_empty_secret(String::new()).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(non_empty_secret("k".to_string()).unwrap(), b"k".to_vec());
    }

    #[test]
    fn non_hex_signature_is_malformed() {
        assert_eq!(
            verify(SECRET, "videos/acme.mp4", 1_000, "not-hex", 0),
            Err(SignatureError::Malformed)
        );
    }
}
