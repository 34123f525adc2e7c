//! Shared application state.

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use takenote_core::{AuthVerifier, NoteRepository};
use takenote_inference::AiService;

use crate::config::Settings;

/// Per-client rate limiter keyed by client address.
pub type ClientRateLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteRepository>,
    pub auth: Arc<dyn AuthVerifier>,
    pub ai: AiService,
    /// None when rate limiting is disabled.
    pub rate_limiter: Option<Arc<ClientRateLimiter>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        auth: Arc<dyn AuthVerifier>,
        ai: AiService,
        settings: Settings,
    ) -> Self {
        let rate_limiter = build_rate_limiter(&settings).map(Arc::new);
        Self {
            notes,
            auth,
            ai,
            rate_limiter,
            settings: Arc::new(settings),
        }
    }
}

/// `RATE_LIMIT_REQUESTS` per `RATE_LIMIT_PERIOD_SECS` for each client, with
/// the full allowance available as a burst.
fn build_rate_limiter(settings: &Settings) -> Option<ClientRateLimiter> {
    if !settings.rate_limit_enabled {
        return None;
    }
    let burst = NonZeroU32::new(settings.rate_limit_requests)?;
    let replenish = settings.rate_limit_period() / burst.get();
    let quota = Quota::with_period(replenish)?.allow_burst(burst);
    Some(RateLimiter::keyed(quota))
}
