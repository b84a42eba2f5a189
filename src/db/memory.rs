use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, DocumentStore, Filter, Page};
use crate::error::{conflict_error, database_error, Error};

struct Entry {
    id: Uuid,
    seq: u64,
    created_at: DateTime<Utc>,
    data: Value,
}

/// In-process document store with the same ordering and uniqueness rules as
/// `PgStore`. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Entry>>>,
    next_seq: AtomicU64,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `ping` fail, simulating a lost database connection.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), Error> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(database_error("memory store is offline"));
        }

        Ok(())
    }

    async fn insert(
        &self,
        collection: Collection,
        id: Uuid,
        created_at: DateTime<Utc>,
        data: Value,
    ) -> Result<(), Error> {
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection).or_default();

        if entries.iter().any(|e| e.id == id) {
            return Err(conflict_error(format!("duplicate id {}", id)));
        }

        if let Some(field) = collection.unique_field() {
            let value = data.get(field);

            if value.is_some() && entries.iter().any(|e| e.data.get(field) == value) {
                return Err(conflict_error(format!(
                    "duplicate {} in {}",
                    field,
                    collection.name()
                )));
            }
        }

        entries.push(Entry {
            id,
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            created_at,
            data,
        });

        Ok(())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        page: Page,
    ) -> Result<Vec<Value>, Error> {
        let collections = self.collections.read().await;

        let mut matching: Vec<&Entry> = collections
            .get(&collection)
            .map(|entries| entries.iter().filter(|e| filter.matches(&e.data)).collect())
            .unwrap_or_default();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });

        let limit = page.limit.unwrap_or(u64::MAX) as usize;

        Ok(matching
            .into_iter()
            .skip(page.skip as usize)
            .take(limit)
            .map(|e| e.data.clone())
            .collect())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, Error> {
        let collections = self.collections.read().await;

        let count = collections
            .get(&collection)
            .map(|entries| entries.iter().filter(|e| filter.matches(&e.data)).count())
            .unwrap_or(0);

        Ok(count as u64)
    }

    async fn replace(&self, collection: Collection, id: Uuid, data: Value) -> Result<bool, Error> {
        let mut collections = self.collections.write().await;

        let entry = collections
            .get_mut(&collection)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == id));

        match entry {
            Some(entry) => {
                entry.data = data;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, Error> {
        let mut collections = self.collections.write().await;

        let Some(entries) = collections.get_mut(&collection) else {
            return Ok(false);
        };

        let before = entries.len();
        entries.retain(|e| e.id != id);

        Ok(entries.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[tokio::test]
    async fn newest_first_with_paging_test() {
        let store = MemoryStore::new();
        let now = Utc::now();

        for i in 0..5 {
            store
                .insert(
                    Collection::Trips,
                    Uuid::new_v4(),
                    now + Duration::seconds(i),
                    json!({"n": i, "status": "pending"}),
                )
                .await
                .unwrap();
        }

        let docs = store
            .find(Collection::Trips, &Filter::new(), Page::new(1, 2))
            .await
            .unwrap();
        let ns: Vec<i64> = docs.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![3, 2]);

        let count = store
            .count(Collection::Trips, &Filter::new().eq("status", "pending"))
            .await
            .unwrap();
        assert_eq!(count, 5);
    }

    #[tokio::test]
    async fn unique_field_conflict_test() {
        let store = MemoryStore::new();
        let now = Utc::now();

        store
            .insert(Collection::Billings, Uuid::new_v4(), now, json!({"tripId": "t1"}))
            .await
            .unwrap();

        let err = store
            .insert(Collection::Billings, Uuid::new_v4(), now, json!({"tripId": "t1"}))
            .await
            .unwrap_err();
        assert!(err.is_conflict_error());

        // uniqueness is per collection
        store
            .insert(Collection::Trips, Uuid::new_v4(), now, json!({"tripId": "t1"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn replace_and_delete_unknown_id_test() {
        let store = MemoryStore::new();

        let replaced = store
            .replace(Collection::Reservations, Uuid::new_v4(), json!({}))
            .await
            .unwrap();
        assert!(!replaced);

        let deleted = store
            .delete(Collection::Reservations, Uuid::new_v4())
            .await
            .unwrap();
        assert!(!deleted);
    }
}
