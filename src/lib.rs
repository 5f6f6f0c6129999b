//! # Outreach Delivery - Cloudflare Workers
//!
//! Personalized video delivery for outreach pages, built with Rust and
//! Cloudflare Workers. A visitor arrives with an identity token in the `vid`
//! query parameter; the service resolves it to a company name and a storage
//! path, obtains a time-limited download URL for the matching video, and
//! reports a playback session state (loading, ready or error) to the page.
//!
//! ## Architecture
//!
//! - **Identity**: Reads the token once and derives the display name
//! - **Source**: Maps an identity to `videos/{identity}.mp4`
//! - **Storage**: Firebase Storage or R2 behind one trait
//! - **Locator**: Turns storage answers and faults into retrieval results
//! - **Playback**: Loading → ready | error state machine
//! - **Router / Handlers**: HTTP surface for the page
//!
//! ## Example Usage
//!
//! ```text
//! GET /api/session?vid=elite-dental   - Resolve the playback session
//! GET /api/identity?vid=elite-dental  - Company name for the page header
//! GET /api/delivery?vid=elite-dental  - Identity, session and brand logo
//! ```

use std::sync::{Arc, OnceLock};
use worker::*;

mod config;
mod constants;
mod errors;
mod handlers;
mod identity;
mod locator;
mod logging;
mod middleware;
mod models;
mod playback;
mod router;
mod signing;
mod source;
mod storage;
mod utils;

use config::Config;
use constants::STORAGE_CONFIG_KV_NAME;

static CONFIG_CACHE: OnceLock<Arc<Config>> = OnceLock::new();

/// Main entry point for the Cloudflare Worker.
///
/// 1. Sets up panic handling for better debugging
/// 2. Loads configuration from KV storage with fallback to defaults
/// 3. Delegates request routing to the router module
#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    // Set up panic hook for better error reporting in development
    console_error_panic_hook::set_once();

    let config = load_config(&env).await?;

    router::handle_request(req, env, config).await
}

async fn load_config(env: &Env) -> Result<Arc<Config>> {
    if let Some(config) = CONFIG_CACHE.get() {
        return Ok(config.clone());
    }

    let kv = env.kv(STORAGE_CONFIG_KV_NAME)?;
    let config = Arc::new(Config::load(&kv).await?);
    let _ = CONFIG_CACHE.set(config.clone());
    Ok(config)
}
