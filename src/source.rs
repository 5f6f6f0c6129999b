//! # Source Path Resolution
//!
//! Maps an identity to the storage location of its outreach video. The
//! layout is fixed: `videos/{identity}.mp4`, with `default-outreach` standing
//! in when there is no identity.

use crate::constants::{FALLBACK_IDENTITY, VIDEO_EXTENSION, VIDEO_FOLDER};
use crate::identity::resolve_identity;
use crate::models::{DeliverySession, Identity, SourceDescriptor};

/// Derives where the video for `identity` lives in storage.
///
/// # Arguments
///
/// * `identity` - The resolved visitor identity
///
/// # Returns
///
/// * `SourceDescriptor` - Identity, file name and storage path, e.g.
///   `videos/elite-dental.mp4`, or `videos/default-outreach.mp4` when the
///   identity has no token
pub fn resolve_source(identity: &Identity) -> SourceDescriptor {
    let identity = match identity.raw_id.as_deref() {
        Some(raw_id) if !raw_id.is_empty() => raw_id,
        _ => FALLBACK_IDENTITY,
    };
    let filename = format!("{}.{}", identity, VIDEO_EXTENSION);
    let storage_path = format!("{}/{}", VIDEO_FOLDER, filename);

    SourceDescriptor {
        identity: identity.to_string(),
        filename,
        storage_path,
    }
}

impl DeliverySession {
    pub fn new(identity: Identity) -> Self {
        let source = resolve_source(&identity);
        Self { identity, source }
    }

    /// Resolves identity and source from an already-validated token.
    pub fn from_token(token: Option<String>) -> Self {
        Self::new(resolve_identity(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_path_from_identity() {
        let source = resolve_source(&resolve_identity(Some("elite-dental".into())));
        assert_eq!(source.identity, "elite-dental");
        assert_eq!(source.filename, "elite-dental.mp4");
        assert_eq!(source.storage_path, "videos/elite-dental.mp4");
    }

    #[test]
    fn missing_identity_uses_default_outreach() {
        let source = resolve_source(&resolve_identity(None));
        assert_eq!(source.identity, "default-outreach");
        assert_eq!(source.storage_path, "videos/default-outreach.mp4");
    }

    #[test]
    fn empty_raw_id_uses_default_outreach() {
        let identity = Identity {
            raw_id: Some(String::new()),
            company_name: "[Company Name]".into(),
        };
        assert_eq!(resolve_source(&identity).storage_path, "videos/default-outreach.mp4");
    }

    #[test]
    fn resolution_is_deterministic() {
        let identity = resolve_identity(Some("acme-robotics".into()));
        assert_eq!(resolve_source(&identity), resolve_source(&identity));
    }

    #[test]
    fn session_from_token_composes_both_resolvers() {
        let session = DeliverySession::from_token(None);
        assert_eq!(session.identity.company_name, "[Company Name]");
        assert_eq!(session.source.filename, "default-outreach.mp4");
    }
}
