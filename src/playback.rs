//! # Playback Session Controller
//!
//! Drives one session from loading to a terminal state:
//!
//! ```text
//! Loading ──locate ok, status success──▶ Ready
//!    │────locate ok, status error────▶ Error (message from the result)
//!    └────locate failed──────────────▶ Error (fixed critical message)
//! ```
//!
//! The locator is called exactly once per session and nothing here returns
//! an error; every outcome is a well-formed [`PlaybackSessionState`].

use crate::locator::AssetLocator;
use crate::log_data;
use crate::logging::Logger;
use crate::models::{DeliverySession, PlaybackSessionState, RetrievalResult};

pub struct PlaybackSessionController<L> {
    locator: L,
    logger: Logger,
}

impl<L: AssetLocator> PlaybackSessionController<L> {
    pub fn new(locator: L, logger: Logger) -> Self {
        Self { locator, logger }
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// State to render before the lookup completes. It does not depend on
    /// the locator, so pages can fetch it before a controller exists.
    pub fn initial_state() -> PlaybackSessionState {
        PlaybackSessionState::loading()
    }

    pub async fn init_session(&self, session: &DeliverySession) -> PlaybackSessionState {
        let next = match self.locator.locate(&session.source).await {
            Ok(result) => Self::from_result(result),
            Err(failure) => {
                self.logger.error(
                    "Playback initialization failed",
                    log_data!(
                        "storage_path" => session.source.storage_path,
                        "error" => failure.to_string()
                    ),
                );
                PlaybackSessionState::critical_error()
            }
        };

        self.logger.info(
            "Playback session resolved",
            log_data!(
                "identity" => next.identity,
                "phase" => next.status.phase_name(),
                "message" => next.status.message()
            ),
        );
        next
    }

    fn from_result(result: RetrievalResult) -> PlaybackSessionState {
        match (result.is_success(), result.download_url) {
            (true, Some(download_url)) => PlaybackSessionState::ready(result.identity, download_url),
            // A success without a URL cannot be played.
            (true, None) => PlaybackSessionState::managed_error(result.identity, None),
            (false, _) => PlaybackSessionState::managed_error(result.identity, result.message),
        }
    }
}
