use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{Store, StoreError, with_id};
use crate::models::{DeleteResult, Document, InsertOneResult, UpdateResult, project_service};

/// Document stored together with its insertion sequence number.
#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    doc: Document,
}

/// In-process store backed by concurrent maps.
///
/// Listings are returned in insertion order, like the PostgreSQL store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    services: DashMap<Uuid, Entry>,
    checkouts: DashMap<Uuid, Entry>,
    next_seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a service document. Services are maintained out of band, so this
    /// is not part of [`Store`].
    pub fn insert_service(&self, mut service: Document) -> Uuid {
        service.remove("_id");
        let id = Uuid::new_v4();
        self.services.insert(id, self.entry(service));
        id
    }

    fn entry(&self, doc: Document) -> Entry {
        Entry {
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            doc,
        }
    }

    fn ordered(entries: impl Iterator<Item = (Uuid, Entry)>) -> Vec<Document> {
        let mut entries: Vec<_> = entries.collect();
        entries.sort_by_key(|(_, entry)| entry.seq);
        entries
            .into_iter()
            .map(|(id, entry)| with_id(id, entry.doc))
            .collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    #[instrument(skip_all)]
    async fn list_services(&self) -> Result<Vec<Document>, StoreError> {
        let services = Self::ordered(
            self.services
                .iter()
                .map(|item| (*item.key(), item.value().clone())),
        );
        debug!(count = services.len(), "Listed services");
        Ok(services)
    }

    #[instrument(skip(self))]
    async fn find_service(&self, id: Uuid) -> Result<Option<Document>, StoreError> {
        Ok(self
            .services
            .get(&id)
            .map(|entry| project_service(with_id(id, entry.doc.clone()))))
    }

    #[instrument(skip(self))]
    async fn list_checkouts(&self, owner_email: &str) -> Result<Vec<Document>, StoreError> {
        let checkouts = Self::ordered(
            self.checkouts
                .iter()
                .filter(|item| {
                    item.value().doc.get("email").and_then(Value::as_str) == Some(owner_email)
                })
                .map(|item| (*item.key(), item.value().clone())),
        );
        debug!(count = checkouts.len(), "Listed checkouts");
        Ok(checkouts)
    }

    #[instrument(skip_all)]
    async fn insert_checkout(&self, mut checkout: Document) -> Result<InsertOneResult, StoreError> {
        checkout.remove("_id");
        let id = Uuid::new_v4();
        self.checkouts.insert(id, self.entry(checkout));
        debug!(%id, "Inserted checkout");
        Ok(InsertOneResult::new(id))
    }

    #[instrument(skip(self))]
    async fn update_checkout_status(
        &self,
        id: Uuid,
        status: Value,
    ) -> Result<UpdateResult, StoreError> {
        let Some(mut entry) = self.checkouts.get_mut(&id) else {
            return Ok(UpdateResult::new(0, 0));
        };
        if entry.doc.get("status") == Some(&status) {
            return Ok(UpdateResult::new(1, 0));
        }
        entry.doc.insert("status".to_string(), status);
        Ok(UpdateResult::new(1, 1))
    }

    #[instrument(skip(self))]
    async fn delete_checkout(&self, id: Uuid) -> Result<DeleteResult, StoreError> {
        let deleted = self.checkouts.remove(&id).map_or(0, |_| 1);
        Ok(DeleteResult::new(deleted))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[tokio::test]
    async fn checkouts_are_listed_per_owner_in_insertion_order() {
        let store = MemoryStore::new();
        let first = store
            .insert_checkout(doc(json!({"email": "a@x.com", "service": "oil-change"})))
            .await
            .unwrap();
        store
            .insert_checkout(doc(json!({"email": "b@x.com", "service": "brakes"})))
            .await
            .unwrap();
        let second = store
            .insert_checkout(doc(json!({"email": "a@x.com", "service": "tyres"})))
            .await
            .unwrap();

        let listed = store.list_checkouts("a@x.com").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|d| d["_id"].clone()).collect();
        assert_eq!(
            ids,
            vec![
                json!(first.inserted_id.to_string()),
                json!(second.inserted_id.to_string())
            ]
        );
    }

    #[tokio::test]
    async fn client_supplied_id_is_replaced() {
        let store = MemoryStore::new();
        let result = store
            .insert_checkout(doc(json!({"_id": "mine", "email": "a@x.com"})))
            .await
            .unwrap();

        let listed = store.list_checkouts("a@x.com").await.unwrap();
        assert_eq!(listed[0]["_id"], json!(result.inserted_id.to_string()));
    }

    #[tokio::test]
    async fn status_update_reports_matched_and_modified() {
        let store = MemoryStore::new();
        let id = store
            .insert_checkout(doc(json!({"email": "a@x.com", "status": "pending"})))
            .await
            .unwrap()
            .inserted_id;

        let changed = store
            .update_checkout_status(id, json!("confirmed"))
            .await
            .unwrap();
        assert_eq!(changed, UpdateResult::new(1, 1));

        let unchanged = store
            .update_checkout_status(id, json!("confirmed"))
            .await
            .unwrap();
        assert_eq!(unchanged, UpdateResult::new(1, 0));

        let missing = store
            .update_checkout_status(Uuid::new_v4(), json!("confirmed"))
            .await
            .unwrap();
        assert_eq!(missing, UpdateResult::new(0, 0));
    }

    #[tokio::test]
    async fn delete_is_a_noop_for_unknown_ids() {
        let store = MemoryStore::new();
        let id = store
            .insert_checkout(doc(json!({"email": "a@x.com"})))
            .await
            .unwrap()
            .inserted_id;

        assert_eq!(store.delete_checkout(id).await.unwrap().deleted_count, 1);
        assert_eq!(store.delete_checkout(id).await.unwrap().deleted_count, 0);
        assert!(store.list_checkouts("a@x.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn service_lookup_projects_known_fields() {
        let store = MemoryStore::new();
        let id = store.insert_service(doc(json!({
            "service_id": "01",
            "title": "Oil Change",
            "img": "https://example.com/oil.jpg",
            "price": "20.00",
            "description": "Full synthetic",
            "facility": [{"name": "Filter", "details": "OEM"}],
            "internal_notes": "not for clients"
        })));

        let service = store.find_service(id).await.unwrap().unwrap();
        assert_eq!(service["_id"], json!(id.to_string()));
        assert_eq!(service["title"], json!("Oil Change"));
        assert!(service.get("internal_notes").is_none());

        assert!(store.find_service(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn service_lookup_passes_stored_values_through() {
        let store = MemoryStore::new();
        let id = store.insert_service(doc(json!({
            "title": 7,
            "price": 20,
            "facility": [{"name": "Pads"}]
        })));

        let service = store.find_service(id).await.unwrap().unwrap();
        assert_eq!(
            Value::Object(service),
            json!({
                "_id": id.to_string(),
                "title": 7,
                "price": 20,
                "facility": [{"name": "Pads"}]
            })
        );
    }

    #[tokio::test]
    async fn missing_status_is_stored_as_null() {
        let store = MemoryStore::new();
        let id = store
            .insert_checkout(doc(json!({"email": "a@x.com", "status": "pending"})))
            .await
            .unwrap()
            .inserted_id;

        let result = store.update_checkout_status(id, Value::Null).await.unwrap();
        assert_eq!(result, UpdateResult::new(1, 1));

        let listed = store.list_checkouts("a@x.com").await.unwrap();
        assert_eq!(listed[0]["status"], Value::Null);
        assert_eq!(listed[0]["email"], json!("a@x.com"));
    }
}
