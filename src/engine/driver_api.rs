use super::helpers::{fetch, fetch_all, insert};
use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::{page_of, DriverAPI, DriverQuery},
    db::Filter,
    entities::{Driver, NewDriver},
    error::{not_found_error, Error},
};

#[async_trait]
impl DriverAPI for Engine {
    #[tracing::instrument(skip(self, input))]
    async fn create_driver(&self, input: NewDriver) -> Result<Driver, Error> {
        let driver = Driver::new(input)?;

        insert(self.store(), &driver).await?;

        tracing::info!(driver_id = %driver.id, "driver registered");

        Ok(driver)
    }

    #[tracing::instrument(skip(self))]
    async fn list_drivers(&self, query: DriverQuery) -> Result<Vec<Driver>, Error> {
        let filter = Filter::new().eq_opt("status", query.status.as_deref());

        fetch_all(self.store(), &filter, page_of(query.limit, None)).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_driver(&self, id: Uuid) -> Result<Driver, Error> {
        fetch(self.store(), &id)
            .await?
            .ok_or_else(|| not_found_error("Driver"))
    }
}
