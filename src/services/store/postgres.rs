use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, postgres::PgPoolOptions, types::Json};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::{Store, StoreError, with_id};
use crate::models::{DeleteResult, Document, InsertOneResult, UpdateResult, project_service};

const MAX_CONNECTIONS: u32 = 5;

/// PostgreSQL store keeping every document in a `JSONB` column.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool. Migrations must already be applied.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url` and applies the embedded
    /// migrations.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Db`] - the database cannot be reached
    /// - [`StoreError::Migrate`] - the schema cannot be created
    #[instrument(skip_all)]
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to connect to database"))?;
        info!("Connected to database");

        sqlx::migrate!().run(&pool).await?;
        info!("Database migrations applied");

        Ok(Self::new(pool))
    }

    /// Closes every pooled connection. Called once on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

fn into_documents(rows: Vec<(Uuid, Json<Document>)>) -> Vec<Document> {
    rows.into_iter()
        .map(|(id, Json(doc))| with_id(id, doc))
        .collect()
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip_all)]
    async fn list_services(&self) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, Json<Document>)>(
            "SELECT id, doc FROM services ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed services");
        Ok(into_documents(rows))
    }

    #[instrument(skip(self))]
    async fn find_service(&self, id: Uuid) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, (Json<Document>,)>("SELECT doc FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some((Json(doc),)) = row else {
            debug!("Service not found");
            return Ok(None);
        };
        Ok(Some(project_service(with_id(id, doc))))
    }

    #[instrument(skip(self))]
    async fn list_checkouts(&self, owner_email: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, Json<Document>)>(
            "SELECT id, doc FROM checkouts WHERE doc ->> 'email' = $1 ORDER BY seq",
        )
        .bind(owner_email)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed checkouts");
        Ok(into_documents(rows))
    }

    #[instrument(skip_all)]
    async fn insert_checkout(&self, mut checkout: Document) -> Result<InsertOneResult, StoreError> {
        checkout.remove("_id");
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO checkouts (id, doc) VALUES ($1, $2)")
            .bind(id)
            .bind(Json(&checkout))
            .execute(&self.pool)
            .await?;

        debug!(%id, "Inserted checkout");
        Ok(InsertOneResult::new(id))
    }

    #[instrument(skip(self))]
    async fn update_checkout_status(
        &self,
        id: Uuid,
        status: Value,
    ) -> Result<UpdateResult, StoreError> {
        let (matched, modified) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            WITH target AS (
                SELECT id, (doc -> 'status') IS DISTINCT FROM $2 AS changed
                FROM checkouts
                WHERE id = $1
                FOR UPDATE
            ),
            updated AS (
                UPDATE checkouts c
                SET doc = jsonb_set(c.doc, '{status}', $2, true)
                FROM target t
                WHERE c.id = t.id AND t.changed
                RETURNING c.id
            )
            SELECT (SELECT COUNT(*) FROM target), (SELECT COUNT(*) FROM updated)
            "#,
        )
        .bind(id)
        .bind(Json(&status))
        .fetch_one(&self.pool)
        .await?;

        debug!(matched, modified, "Updated checkout status");
        Ok(UpdateResult::new(matched as u64, modified as u64))
    }

    #[instrument(skip(self))]
    async fn delete_checkout(&self, id: Uuid) -> Result<DeleteResult, StoreError> {
        let result = sqlx::query("DELETE FROM checkouts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(deleted = result.rows_affected(), "Deleted checkout");
        Ok(DeleteResult::new(result.rows_affected()))
    }
}
