mod billing_api;
mod catalog_api;
mod dashboard_api;
mod driver_api;
mod health_api;
mod helpers;
mod reservation_api;
mod trip_api;
mod truck_api;

use std::sync::Arc;

use crate::{api::API, db::DocumentStore, notifier::Notifier};

pub struct Engine {
    store: Arc<dyn DocumentStore>,
    notifier: Notifier,
}

impl Engine {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

impl API for Engine {}

#[cfg(test)]
pub(crate) fn test_engine() -> (Engine, Arc<crate::db::MemoryStore>) {
    use crate::db::MemoryStore;
    use crate::notifier::DisabledMailer;

    let store = Arc::new(MemoryStore::new());
    let notifier = Notifier::spawn(Arc::new(DisabledMailer), "admin@echohorn.test");

    (Engine::new(store.clone(), notifier), store)
}
