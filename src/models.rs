use serde::{Deserialize, Serialize};

use crate::constants::{MSG_CRITICAL, MSG_INITIALIZING, MSG_RETRIEVAL_FALLBACK, MSG_STREAM_READY};
use crate::errors::RetrievalFailure;

/// Who a delivery session is for.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Token exactly as received, `None` when absent or rejected.
    pub raw_id: Option<String>,
    /// Display name derived from `raw_id`, never empty.
    pub company_name: String,
}

/// Where the video asset for an identity lives.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub identity: String,
    pub filename: String,
    pub storage_path: String,
}

/// Identity plus the storage location derived from it.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DeliverySession {
    pub identity: Identity,
    pub source: SourceDescriptor,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalStatus {
    Success,
    Error,
}

/// Outcome of one download URL lookup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResult {
    pub identity: Option<String>,
    pub storage_path: Option<String>,
    #[serde(rename = "downloadURL")]
    pub download_url: Option<String>,
    pub status: RetrievalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RetrievalResult {
    pub fn success(source: &SourceDescriptor, download_url: String) -> Self {
        Self {
            identity: Some(source.identity.clone()),
            storage_path: Some(source.storage_path.clone()),
            download_url: Some(download_url),
            status: RetrievalStatus::Success,
            message: None,
        }
    }

    /// Error results carry no identity, path or URL.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            identity: None,
            storage_path: None,
            download_url: None,
            status: RetrievalStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RetrievalStatus::Success
    }
}

impl From<&RetrievalFailure> for RetrievalResult {
    fn from(failure: &RetrievalFailure) -> Self {
        let message = failure.to_string();
        if message.trim().is_empty() {
            Self::failure(crate::constants::MSG_UNKNOWN_RETRIEVAL_ERROR)
        } else {
            Self::failure(message)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Loading,
    Ready,
    Error,
}

/// UI-facing status flags. Exactly one of the three flags is set; the
/// fields are private so a status can only be built through the phase
/// constructors below.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStatus {
    is_loading: bool,
    is_ready: bool,
    is_error: bool,
    message: String,
}

impl PlaybackStatus {
    fn new(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            is_loading: phase == Phase::Loading,
            is_ready: phase == Phase::Ready,
            is_error: phase == Phase::Error,
            message: message.into(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the phase this status reports, for log lines.
    pub fn phase_name(&self) -> &'static str {
        if self.is_loading() {
            "loading"
        } else if self.is_ready() {
            "ready"
        } else if self.is_error() {
            "error"
        } else {
            "unknown"
        }
    }
}

/// Snapshot of a playback session handed to the presentation layer.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSessionState {
    pub identity: Option<String>,
    #[serde(rename = "downloadURL")]
    pub download_url: Option<String>,
    pub status: PlaybackStatus,
}

impl PlaybackSessionState {
    pub fn loading() -> Self {
        Self {
            identity: None,
            download_url: None,
            status: PlaybackStatus::new(Phase::Loading, MSG_INITIALIZING),
        }
    }

    pub fn ready(identity: Option<String>, download_url: String) -> Self {
        Self {
            identity,
            download_url: Some(download_url),
            status: PlaybackStatus::new(Phase::Ready, MSG_STREAM_READY),
        }
    }

    pub fn managed_error(identity: Option<String>, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| MSG_RETRIEVAL_FALLBACK.to_string());
        Self {
            identity,
            download_url: None,
            status: PlaybackStatus::new(Phase::Error, message),
        }
    }

    pub fn critical_error() -> Self {
        Self {
            identity: None,
            download_url: None,
            status: PlaybackStatus::new(Phase::Error, MSG_CRITICAL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(state: &PlaybackSessionState) -> [bool; 3] {
        [
            state.status.is_loading(),
            state.status.is_ready(),
            state.status.is_error(),
        ]
    }

    #[test]
    fn each_phase_sets_exactly_one_flag() {
        let states = [
            PlaybackSessionState::loading(),
            PlaybackSessionState::ready(Some("acme".into()), "https://cdn/x".into()),
            PlaybackSessionState::managed_error(None, None),
            PlaybackSessionState::critical_error(),
        ];
        for state in &states {
            assert_eq!(flags(state).iter().filter(|f| **f).count(), 1, "{state:?}");
        }
    }

    #[test]
    fn phase_name_follows_the_set_flag() {
        assert_eq!(PlaybackSessionState::loading().status.phase_name(), "loading");
        assert_eq!(
            PlaybackSessionState::ready(None, "https://cdn.test/v.mp4".into()).status.phase_name(),
            "ready"
        );
        assert_eq!(PlaybackSessionState::critical_error().status.phase_name(), "error");
    }

    #[test]
    fn managed_error_falls_back_on_empty_message() {
        let state = PlaybackSessionState::managed_error(None, Some(String::new()));
        assert_eq!(state.status.message(), MSG_RETRIEVAL_FALLBACK);
    }

    #[test]
    fn session_state_serializes_with_presentation_keys() {
        let state = PlaybackSessionState::ready(Some("acme".into()), "https://cdn/x".into());
        let value = serde_json::to_value(&state).unwrap();

        assert_eq!(value["downloadURL"], "https://cdn/x");
        assert_eq!(value["status"]["isReady"], true);
        assert_eq!(value["status"]["isLoading"], false);
        assert_eq!(value["status"]["message"], MSG_STREAM_READY);
    }

    #[test]
    fn failure_result_omits_location_fields() {
        let result = RetrievalResult::from(&RetrievalFailure::Network(String::new()));
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["status"], "error");
        assert!(value["downloadURL"].is_null());
        assert!(value["storagePath"].is_null());
        assert_eq!(value["message"], crate::constants::MSG_UNKNOWN_RETRIEVAL_ERROR);
    }

    #[test]
    fn identity_uses_camel_case_keys() {
        let identity = Identity {
            raw_id: Some("elite-dental".into()),
            company_name: "Elite Dental".into(),
        };
        let value = serde_json::to_value(&identity).unwrap();
        assert_eq!(value["rawId"], "elite-dental");
        assert_eq!(value["companyName"], "Elite Dental");
    }
}
