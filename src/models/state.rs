use std::sync::Arc;

use tracing::{debug, info};

use crate::services::{jwt::JwtService, store::Store};
use crate::utils::config::AppConfig;
use crate::utils::constant::*;

/// Attributes of the session cookie set by `POST /jwt`.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub secure: bool,
}

/// Application state shared across requests. Needs to be thread-safe.
pub struct AppState {
    /// The document store holding services and checkouts.
    pub store: Arc<dyn Store>,
    /// JWT service for session token issuance and validation.
    pub jwt_service: JwtService,
    /// How the session cookie is emitted.
    pub cookie_policy: CookiePolicy,
}

impl AppState {
    /// Creates a new application state with the provided store.
    ///
    /// # Arguments
    ///
    /// * `store` - Store implementation used by every handler
    /// * `config` - Startup configuration holding the signing secret
    pub fn new(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        info!("Initializing application state");
        debug!(
            token_expiry_secs = SESSION_TOKEN_EXPIRY.as_secs(),
            secure_cookie = config.secure_cookie,
            "Creating session token service"
        );

        Self {
            store,
            jwt_service: JwtService::new(config.token_secret_bytes(), SESSION_TOKEN_EXPIRY),
            cookie_policy: CookiePolicy {
                secure: config.secure_cookie,
            },
        }
    }
}
