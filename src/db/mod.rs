mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Trips,
    Drivers,
    Trucks,
    Billings,
    Reservations,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Trips,
        Collection::Drivers,
        Collection::Trucks,
        Collection::Billings,
        Collection::Reservations,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Trips => "trips",
            Self::Drivers => "drivers",
            Self::Trucks => "trucks",
            Self::Billings => "billings",
            Self::Reservations => "reservations",
        }
    }

    /// Top-level document field that must be unique across the collection.
    pub fn unique_field(&self) -> Option<&'static str> {
        match self {
            Self::Billings => Some("tripId"),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Eq(String),
    In(Vec<String>),
}

/// Conjunction of conditions over top-level string fields of a document.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    conditions: Vec<(&'static str, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &Uuid) -> Self {
        Self::new().eq("id", id.to_string())
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.conditions.push((field, Condition::Eq(value.into())));
        self
    }

    /// Adds an equality condition only when a non-empty value is given.
    pub fn eq_opt(self, field: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.eq(field, value),
            _ => self,
        }
    }

    pub fn any_of<I, S>(mut self, field: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push((field, Condition::In(values)));
        self
    }

    pub fn conditions(&self) -> &[(&'static str, Condition)] {
        &self.conditions
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.conditions.iter().all(|(field, condition)| {
            let actual = doc.get(*field).and_then(Value::as_str);

            match (condition, actual) {
                (Condition::Eq(expected), Some(actual)) => expected == actual,
                (Condition::In(expected), Some(actual)) => expected.iter().any(|e| e == actual),
                (_, None) => false,
            }
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: Option<u64>,
}

impl Page {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            skip,
            limit: Some(limit),
        }
    }

    pub fn first(limit: u64) -> Self {
        Self::new(0, limit)
    }

    pub fn all() -> Self {
        Self::default()
    }
}

/// A typed record that lives in one collection of the document store.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;
}

/// Untyped per-collection document operations. Results are always ordered
/// newest-first by creation time.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn ping(&self) -> Result<(), Error>;

    async fn insert(
        &self,
        collection: Collection,
        id: Uuid,
        created_at: DateTime<Utc>,
        data: Value,
    ) -> Result<(), Error>;

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        page: Page,
    ) -> Result<Vec<Value>, Error>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, Error>;

    /// Returns false when no document has the given id.
    async fn replace(&self, collection: Collection, id: Uuid, data: Value) -> Result<bool, Error>;

    /// Returns false when no document has the given id.
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, Error>;
}
