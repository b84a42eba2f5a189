use super::helpers::{fetch, fetch_all, insert, replace};
use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::{page_of, TripAPI, TripQuery},
    db::Filter,
    entities::{NewTrip, Trip, TripUpdate},
    error::{not_found_error, Error},
};

#[async_trait]
impl TripAPI for Engine {
    #[tracing::instrument(skip(self, input), fields(vehicle = %input.vehicle_type))]
    async fn create_trip(&self, input: NewTrip) -> Result<Trip, Error> {
        let trip = Trip::new(input)?;

        insert(self.store(), &trip).await?;

        tracing::info!(trip_id = %trip.id, "trip booked");

        Ok(trip)
    }

    #[tracing::instrument(skip(self, query), fields(status = ?query.status))]
    async fn list_trips(&self, query: TripQuery) -> Result<Vec<Trip>, Error> {
        let filter = Filter::new()
            .eq_opt("status", query.status.as_deref())
            .eq_opt("customerEmail", query.customer_email.as_deref());

        fetch_all(self.store(), &filter, page_of(query.limit, query.skip)).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_trip(&self, id: Uuid) -> Result<Trip, Error> {
        fetch(self.store(), &id)
            .await?
            .ok_or_else(|| not_found_error("Trip"))
    }

    #[tracing::instrument(skip(self))]
    async fn update_trip(&self, id: Uuid, update: TripUpdate) -> Result<Trip, Error> {
        let mut trip = self.find_trip(id).await?;

        trip.apply(update)?;

        // deleted between the read and the write
        if !replace(self.store(), &trip).await? {
            return Err(not_found_error("Trip"));
        }

        tracing::info!(status = trip.status.name(), "trip updated");

        Ok(trip)
    }
}
