use super::helpers::{fetch, fetch_all, insert, replace};
use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::{page_of, ReservationAPI, ReservationQuery},
    db::{Collection, Filter, Page},
    entities::{
        NewReservation, Reservation, ReservationStats, ReservationStatus, ReservationUpdate,
    },
    error::{not_found_error, Error},
};

const RECENT_LIMIT: u64 = 5;

#[async_trait]
impl ReservationAPI for Engine {
    #[tracing::instrument(skip(self, input), fields(company = %input.company))]
    async fn create_reservation(&self, input: NewReservation) -> Result<Reservation, Error> {
        let reservation = Reservation::new(input)?;

        insert(self.store(), &reservation).await?;

        tracing::info!(reservation_id = %reservation.id, "reservation received");

        // mail delivery never holds up or fails the request
        self.notifier.reservation_created(&reservation);

        Ok(reservation)
    }

    #[tracing::instrument(skip(self))]
    async fn list_reservations(&self, query: ReservationQuery) -> Result<Vec<Reservation>, Error> {
        let filter = Filter::new().eq_opt("status", query.status.as_deref());

        fetch_all(self.store(), &filter, page_of(query.limit, query.skip)).await
    }

    #[tracing::instrument(skip(self))]
    async fn reservation_stats(&self) -> Result<ReservationStats, Error> {
        let store = self.store();
        let all = Filter::new();
        let with_status = |status: ReservationStatus| Filter::new().eq("status", status.name());

        let (pending, contacted, completed) = (
            with_status(ReservationStatus::Pending),
            with_status(ReservationStatus::Contacted),
            with_status(ReservationStatus::Completed),
        );

        let (total, pending, contacted, completed, recent) = futures::try_join!(
            store.count(Collection::Reservations, &all),
            store.count(Collection::Reservations, &pending),
            store.count(Collection::Reservations, &contacted),
            store.count(Collection::Reservations, &completed),
            fetch_all::<Reservation>(store, &all, Page::first(RECENT_LIMIT)),
        )?;

        Ok(ReservationStats {
            total,
            pending,
            contacted,
            completed,
            recent,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn find_reservation(&self, id: Uuid) -> Result<Reservation, Error> {
        fetch(self.store(), &id)
            .await?
            .ok_or_else(|| not_found_error("Reservation"))
    }

    #[tracing::instrument(skip(self))]
    async fn update_reservation(
        &self,
        id: Uuid,
        update: ReservationUpdate,
    ) -> Result<Reservation, Error> {
        let mut reservation = self.find_reservation(id).await?;

        reservation.apply(update)?;

        if !replace(self.store(), &reservation).await? {
            return Err(not_found_error("Reservation"));
        }

        tracing::info!(status = reservation.status.name(), "reservation updated");

        Ok(reservation)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_reservation(&self, id: Uuid) -> Result<(), Error> {
        if !self.store().delete(Collection::Reservations, id).await? {
            return Err(not_found_error("Reservation"));
        }

        tracing::info!("reservation deleted");

        Ok(())
    }
}
