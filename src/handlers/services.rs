//! # Service Catalogue Handlers
//!
//! Read-only access to the service documents. Services are maintained out of
//! band and never written through the API.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{AppState, Document};

/// Lists every service.
///
/// GET /services
#[instrument(skip_all)]
pub async fn list_services(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Document>>> {
    let services = state.store.list_services().await?;
    debug!(count = services.len(), "Services retrieved");
    Ok(Json(services))
}

/// Returns one service with a fixed field projection.
///
/// GET /services/{id}
///
/// # Returns
///
/// - `200 OK` with the projected service, or `null` when the id is unknown
/// - `400 Bad Request` - malformed id
#[instrument(skip(state))]
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Option<Document>>> {
    let id = Uuid::try_parse(&id)?;
    let service = state.store.find_service(id).await?;
    debug!(found = service.is_some(), "Service lookup finished");
    Ok(Json(service))
}
