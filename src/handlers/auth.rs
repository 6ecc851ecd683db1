//! # Session Token Handler
//!
//! `POST /jwt` exchanges the caller's identity for a signed session token
//! delivered in an HTTP-only cookie. No credentials are checked: the site's
//! front end authenticates users before calling this endpoint.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::AppState;
use crate::services::jwt::Identity;
use crate::utils::constant::SESSION_COOKIE_NAME;

/// Response body of `POST /jwt`
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenIssued {
    pub success: bool,
}

/// Issues a session token for the supplied identity.
///
/// # Returns
///
/// - `200 OK` with `{"success": true}` and a `token` cookie
/// - `400 Bad Request` - empty email
/// - `422 Unprocessable Entity` - body is not an identity object
#[instrument(
    skip_all,
    fields(
        email = %identity.email,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(identity): Json<Identity>,
) -> AppResult<(CookieJar, Json<TokenIssued>)> {
    if identity.validate().is_err() {
        warn!("Identity without email provided");
        return Err(AppError::BadRequest("Invalid input"));
    }

    let token = state.jwt_service.issue(identity)?;

    let cookie = Cookie::build((SESSION_COOKIE_NAME, token))
        .http_only(true)
        .secure(state.cookie_policy.secure)
        .path("/");

    info!("Session token issued");
    Ok((jar.add(cookie), Json(TokenIssued { success: true })))
}
