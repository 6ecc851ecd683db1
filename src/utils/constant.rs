//! # Application Constants
//!
//! This module defines configuration constants used throughout the application.
//! These constants control token lifetime, cookie naming and configuration defaults.

use std::time::Duration;

/// Expiration time for session tokens
///
/// Tokens are not refreshed; the client has to call `POST /jwt` again.
pub const SESSION_TOKEN_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "token";

/// Port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 5000;

/// The single browser origin allowed to make credentialed requests
pub const DEFAULT_CORS_ORIGIN: &str = "https://car-doctor-28.surge.sh";

/// Used when `DATABASE_URL` is not set
pub const DEFAULT_DB_HOST: &str = "localhost:5432";
pub const DEFAULT_DB_NAME: &str = "car_doctor";

