//! # Authentication Middleware
//!
//! This module contains the session gate that validates the JWT carried in
//! the `token` cookie and provides the caller's identity to protected routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, instrument, trace, warn};

use crate::error::{AppResult, AuthError};
use crate::models::AppState;
use crate::services::jwt::Claims;
use crate::utils::constant::SESSION_COOKIE_NAME;

/// Authentication middleware for protecting routes
///
/// # Authentication Flow
///
/// 1. Reads the session token from the `token` cookie
/// 2. Validates the JWT signature and expiration
/// 3. Adds [`AuthUser`] to request extensions for handler access
///
/// # Returns
///
/// - **Success**: Continues to next handler with user context
/// - **Failure**: Returns `401 Unauthorized` for missing or invalid tokens
#[instrument(
    skip_all,
    fields(
        method = %req.method(),
        uri = %req.uri(),
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    trace!("Processing authentication middleware");

    let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
        warn!("Missing session cookie");
        return Err(AuthError::Unauthenticated.into());
    };

    let claims = state.jwt_service.verify(cookie.value()).inspect_err(|e| {
        warn!(error = %e, "Session token validation failed");
    })?;

    debug!(email = %claims.identity.email, "Authentication successful");
    req.extensions_mut().insert(AuthUser { claims });

    Ok(next.run(req).await)
}

/// Authenticated caller information available to handlers
///
/// Inserted into request extensions by [`auth_middleware`].
///
/// # Usage in Handlers
///
/// ```rust
/// use axum::{extract::Extension, response::IntoResponse};
/// use car_doctor::middleware::AuthUser;
/// async fn protected_handler(Extension(user): Extension<AuthUser>) -> impl IntoResponse {
///     format!("Hello {}", user.email())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Decoded session token claims
    pub claims: Claims,
}

impl AuthUser {
    pub fn email(&self) -> &str {
        &self.claims.identity.email
    }
}
