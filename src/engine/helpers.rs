use uuid::Uuid;

use crate::{
    db::{Document, DocumentStore, Filter, Page},
    error::Error,
};

pub async fn insert<T: Document>(store: &dyn DocumentStore, doc: &T) -> Result<(), Error> {
    let data = serde_json::to_value(doc)?;

    store
        .insert(T::COLLECTION, doc.id(), doc.created_at(), data)
        .await
}

/// Overwrites the stored document; false when it no longer exists.
pub async fn replace<T: Document>(store: &dyn DocumentStore, doc: &T) -> Result<bool, Error> {
    let data = serde_json::to_value(doc)?;

    store.replace(T::COLLECTION, doc.id(), data).await
}

pub async fn fetch_all<T: Document>(
    store: &dyn DocumentStore,
    filter: &Filter,
    page: Page,
) -> Result<Vec<T>, Error> {
    store
        .find(T::COLLECTION, filter, page)
        .await?
        .into_iter()
        .map(|data| serde_json::from_value(data).map_err(Error::from))
        .collect()
}

/// Newest document matching the filter.
pub async fn fetch_one<T: Document>(
    store: &dyn DocumentStore,
    filter: &Filter,
) -> Result<Option<T>, Error> {
    Ok(fetch_all(store, filter, Page::first(1)).await?.pop())
}

pub async fn fetch<T: Document>(store: &dyn DocumentStore, id: &Uuid) -> Result<Option<T>, Error> {
    fetch_one(store, &Filter::by_id(id)).await
}

/// Resolves an optional cross-reference. Unset or malformed ids, missing
/// records and lookup failures all yield `None`.
pub async fn fetch_referenced<T: Document>(
    store: &dyn DocumentStore,
    id: Option<&str>,
) -> Result<Option<T>, Error> {
    let Some(id) = id.and_then(|id| Uuid::parse_str(id).ok()) else {
        return Ok(None);
    };

    match fetch(store, &id).await {
        Ok(doc) => Ok(doc),
        Err(err) => {
            tracing::warn!(%id, error = %err, "ignoring failed reference lookup");
            Ok(None)
        }
    }
}
