//! # Document Store
//!
//! Services and checkouts are schemaless documents. Handlers only see the
//! [`Store`] trait, so the backing database can be swapped without touching
//! the HTTP layer.
//!
//! ## Implementations
//!
//! - [`PgStore`] - PostgreSQL, documents kept in `JSONB` columns
//! - [`MemoryStore`] - In-process maps, used by tests and local runs

mod memory;
mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{DeleteResult, Document, InsertOneResult, UpdateResult};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by a store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Operations the HTTP handlers need from the database.
///
/// Every method is a single round trip. Documents returned carry their
/// identifier under `_id`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns every service document in insertion order.
    async fn list_services(&self) -> Result<Vec<Document>, StoreError>;

    /// Returns the service with only the projected fields, or `None` when the
    /// id is unknown.
    async fn find_service(&self, id: Uuid) -> Result<Option<Document>, StoreError>;

    /// Returns the checkouts whose `email` field equals `owner_email`.
    async fn list_checkouts(&self, owner_email: &str) -> Result<Vec<Document>, StoreError>;

    /// Stores a new checkout under a freshly generated id.
    ///
    /// Any `_id` in the payload is discarded.
    async fn insert_checkout(&self, checkout: Document) -> Result<InsertOneResult, StoreError>;

    /// Sets the `status` field of one checkout, leaving other fields alone.
    async fn update_checkout_status(
        &self,
        id: Uuid,
        status: Value,
    ) -> Result<UpdateResult, StoreError>;

    /// Removes one checkout.
    async fn delete_checkout(&self, id: Uuid) -> Result<DeleteResult, StoreError>;
}

/// Returns `doc` with its identifier stored under `_id`.
pub(crate) fn with_id(id: Uuid, mut doc: Document) -> Document {
    doc.insert("_id".to_string(), Value::String(id.to_string()));
    doc
}
