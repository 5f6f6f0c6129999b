//! # Delivery Session Handlers
//!
//! Endpoints consumed by the video page. Each request reads the identity
//! token from its URL once, then runs the pure resolvers and, where needed,
//! a playback controller wired to the configured storage backend.
//!
//! ```text
//! GET /api/identity?vid=…       → Identity
//! GET /api/session?vid=…        → PlaybackSessionState (terminal)
//! GET /api/session/initial      → PlaybackSessionState (loading)
//! GET /api/preview?vid=…        → { identity, previewURL }
//! GET /api/brand/logo           → RetrievalResult
//! GET /api/delivery?vid=…       → { identity, session, logo }
//! ```

use serde::Serialize;
use worker::*;

use crate::config::Config;
use crate::errors::{AppResult, UnexpectedFailure};
use crate::identity::{read_identity_token, TokenRead};
use crate::locator::RemoteAssetLocator;
use crate::log_data;
use crate::logging::Logger;
use crate::models::{DeliverySession, Identity, PlaybackSessionState, RetrievalResult};
use crate::playback::PlaybackSessionController;
use crate::storage::storage_for;

type Controller = PlaybackSessionController<RemoteAssetLocator>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    identity: Identity,
    #[serde(rename = "previewURL")]
    preview_url: Option<String>,
}

#[derive(Serialize)]
struct DeliveryResponse {
    identity: Identity,
    session: PlaybackSessionState,
    logo: RetrievalResult,
}

/// Reads the identity token from `url`; rejected tokens fall back to no identity.
fn delivery_session(url: &Url, config: &Config, logger: &Logger) -> DeliverySession {
    let token = match read_identity_token(url, &config.identity_param) {
        TokenRead::Rejected(value) => {
            logger.warn(
                "Identity token rejected, using fallback identity",
                log_data!("param" => config.identity_param, "length" => value.len()),
            );
            None
        }
        read => read.into_token(),
    };
    DeliverySession::from_token(token)
}

fn build_controller(config: &Config, env: &Env, url: &Url, logger: &Logger) -> AppResult<Controller> {
    config.validate()?;
    let storage = storage_for(config, env, url)?;
    Ok(PlaybackSessionController::new(
        RemoteAssetLocator::new(storage, logger.clone()),
        logger.clone(),
    ))
}

/// Resolves the session, or the critical error state when no controller
/// could be built for this deployment.
async fn resolve_session(
    controller: &AppResult<Controller>,
    session: &DeliverySession,
    logger: &Logger,
) -> PlaybackSessionState {
    match controller {
        Ok(controller) => controller.init_session(session).await,
        Err(e) => {
            logger.error(
                "Playback controller unavailable",
                log_data!("error" => e.to_string()),
            );
            PlaybackSessionState::critical_error()
        }
    }
}

async fn resolve_logo(controller: &AppResult<Controller>, config: &Config, logger: &Logger) -> RetrievalResult {
    let outcome = match controller {
        Ok(controller) => controller.locator().locate_path(&config.brand_logo_path).await,
        Err(e) => Err(UnexpectedFailure::Internal(e.to_string())),
    };
    outcome.unwrap_or_else(|e| {
        logger.error("Brand logo lookup failed", log_data!("error" => e.to_string()));
        RetrievalResult::failure(e.to_string())
    })
}

pub async fn get_identity(req: Request, config: &Config, logger: &Logger) -> AppResult<Response> {
    let session = delivery_session(&req.url()?, config, logger);
    Ok(Response::from_json(&session.identity)?)
}

pub async fn get_initial_state() -> AppResult<Response> {
    Ok(Response::from_json(&Controller::initial_state())?)
}

pub async fn get_session(req: Request, env: &Env, config: &Config, logger: &Logger) -> AppResult<Response> {
    let url = req.url()?;
    let session = delivery_session(&url, config, logger);
    let controller = build_controller(config, env, &url, logger);
    let state = resolve_session(&controller, &session, logger).await;
    Ok(Response::from_json(&state)?)
}

/// Best-effort public URL for the blurred preview. Any failure here only
/// removes the preview.
pub async fn get_preview(req: Request, env: &Env, config: &Config, logger: &Logger) -> AppResult<Response> {
    let url = req.url()?;
    let session = delivery_session(&url, config, logger);

    let preview_url = match session.identity.raw_id.as_deref() {
        None => None,
        Some(_) => match config.validate().and_then(|_| storage_for(config, env, &url)) {
            Ok(storage) => storage.public_url(&storage.reference(&session.source.storage_path)),
            Err(e) => {
                logger.warn("Preview unavailable", log_data!("error" => e.to_string()));
                None
            }
        },
    };

    Ok(Response::from_json(&PreviewResponse {
        identity: session.identity,
        preview_url,
    })?)
}

pub async fn get_brand_logo(req: Request, env: &Env, config: &Config, logger: &Logger) -> AppResult<Response> {
    let url = req.url()?;
    let controller = build_controller(config, env, &url, logger);
    let logo = resolve_logo(&controller, config, logger).await;
    Ok(Response::from_json(&logo)?)
}

/// Everything the video page needs in one round trip. The session and the
/// logo lookups run concurrently.
pub async fn get_delivery(req: Request, env: &Env, config: &Config, logger: &Logger) -> AppResult<Response> {
    let url = req.url()?;
    let session = delivery_session(&url, config, logger);
    let controller = build_controller(config, env, &url, logger);

    let (state, logo) = futures::join!(
        resolve_session(&controller, &session, logger),
        resolve_logo(&controller, config, logger)
    );

    Ok(Response::from_json(&DeliveryResponse {
        identity: session.identity,
        session: state,
        logo,
    })?)
}
