//! # Checkout Handlers
//!
//! CRUD over checkout documents. Listing is the only gated route: the caller
//! may only list checkouts whose owner email equals the email in their
//! session token. Creation, status updates and deletion are open.

use std::sync::Arc;

use axum::extract::{Extension, Json, Path, Query, State};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{AppResult, AuthError};
use crate::middleware::AuthUser;
use crate::models::{
    AppState, CheckoutQuery, DeleteResult, Document, InsertOneResult, StatusUpdate, UpdateResult,
};

/// Lists the caller's checkouts.
///
/// GET /checkouts?email=
///
/// # Returns
///
/// - `200 OK` with the checkouts owned by `email`
/// - `401 Unauthorized` - missing or invalid session (from the gate)
/// - `403 Forbidden` - `email` missing or not the caller's
#[instrument(
    skip_all,
    fields(
        caller = %user.email(),
        requested = ?query.email,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn list_checkouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<CheckoutQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let Some(email) = query.email.filter(|email| email == user.email()) else {
        warn!("Caller requested checkouts of another owner");
        return Err(AuthError::Forbidden.into());
    };

    let checkouts = state.store.list_checkouts(&email).await?;
    debug!(count = checkouts.len(), "Checkouts retrieved");
    Ok(Json(checkouts))
}

/// Stores a checkout exactly as submitted.
///
/// POST /checkouts
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn create_checkout(
    State(state): State<Arc<AppState>>,
    Json(checkout): Json<Document>,
) -> AppResult<Json<InsertOneResult>> {
    let result = state.store.insert_checkout(checkout).await?;
    info!(id = %result.inserted_id, "Checkout created");
    Ok(Json(result))
}

/// Replaces the `status` of one checkout.
///
/// PATCH /checkouts/{id}
///
/// An unknown id is not an error; the counts in the response are zero.
#[instrument(skip(state, update), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn update_checkout_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> AppResult<Json<UpdateResult>> {
    let id = Uuid::try_parse(&id)?;
    let result = state
        .store
        .update_checkout_status(id, update.status)
        .await?;
    info!(
        matched = result.matched_count,
        modified = result.modified_count,
        "Checkout status update finished"
    );
    Ok(Json(result))
}

/// Deletes one checkout.
///
/// DELETE /checkouts/{id}
#[instrument(skip(state), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn delete_checkout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResult>> {
    let id = Uuid::try_parse(&id)?;
    let result = state.store.delete_checkout(id).await?;
    info!(deleted = result.deleted_count, "Checkout delete finished");
    Ok(Json(result))
}
