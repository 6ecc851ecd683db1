//! # Health Check Handler
//!
//! Root endpoint used by hosting platforms and humans to see the server is up.

use tracing::{debug, instrument};

/// Static liveness message served at `GET /`.
pub const HEALTH_MESSAGE: &str = "Car Doctor server in running...";

/// Health check endpoint that returns a fixed string.
///
/// Performs no database checks.
#[instrument]
pub async fn health_check() -> &'static str {
    debug!("Health check endpoint accessed");
    HEALTH_MESSAGE
}
