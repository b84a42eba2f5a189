use super::helpers::{fetch, fetch_all, fetch_referenced, insert, replace};
use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{page_of, TruckAPI, TruckQuery},
    db::Filter,
    entities::{Driver, LocationUpdate, NewTruck, Truck, TruckLocation},
    error::{not_found_error, Error},
};

#[async_trait]
impl TruckAPI for Engine {
    #[tracing::instrument(skip(self, input), fields(registration = %input.registration_number))]
    async fn create_truck(&self, input: NewTruck) -> Result<Truck, Error> {
        input.check()?;

        // a dangling driver id is kept, only the name snapshot is skipped
        let driver: Option<Driver> =
            fetch_referenced(self.store(), input.driver_id.as_deref()).await?;
        let truck = Truck::new(input, driver.as_ref())?;

        insert(self.store(), &truck).await?;

        tracing::info!(truck_id = %truck.id, "truck registered");

        Ok(truck)
    }

    #[tracing::instrument(skip(self))]
    async fn list_trucks(&self, query: TruckQuery) -> Result<Vec<Truck>, Error> {
        let filter = Filter::new()
            .eq_opt("status", query.status.as_deref())
            .eq_opt("ownerId", query.owner_id.as_deref());

        fetch_all(self.store(), &filter, page_of(query.limit, None)).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_truck(&self, id: Uuid) -> Result<Truck, Error> {
        fetch(self.store(), &id)
            .await?
            .ok_or_else(|| not_found_error("Truck"))
    }

    #[tracing::instrument(skip(self))]
    async fn update_truck_location(
        &self,
        id: Uuid,
        update: LocationUpdate,
    ) -> Result<TruckLocation, Error> {
        update.validate()?;

        let mut truck = self.find_truck(id).await?;
        let location = truck.relocate(update)?.clone();

        if !replace(self.store(), &truck).await? {
            return Err(not_found_error("Truck"));
        }

        Ok(location)
    }
}
