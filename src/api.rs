use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::Page;
use crate::entities::{
    Billing, Dashboard, Driver, LocationUpdate, NewDriver, NewReservation, NewTrip, NewTruck,
    Reservation, ReservationStats, ReservationUpdate, Trip, TripUpdate, Truck, TruckLocation,
    VehicleType,
};
use crate::error::Error;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

/// Clamps client paging to `1..=MAX_LIMIT` records after a non-negative skip.
pub fn page_of(limit: Option<i64>, skip: Option<i64>) -> Page {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let skip = skip.unwrap_or(0).max(0);

    Page::new(skip as u64, limit as u64)
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TripQuery {
    pub status: Option<String>,
    pub customer_email: Option<String>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DriverQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TruckQuery {
    pub status: Option<String>,
    pub owner_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReservationQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

pub trait CatalogAPI {
    fn list_vehicles(&self) -> Vec<VehicleType>;
    fn find_vehicle(&self, key: &str) -> Result<VehicleType, Error>;
    fn list_cities(&self) -> Vec<&'static str>;
}

#[async_trait]
pub trait TripAPI {
    async fn create_trip(&self, input: NewTrip) -> Result<Trip, Error>;
    async fn list_trips(&self, query: TripQuery) -> Result<Vec<Trip>, Error>;
    async fn find_trip(&self, id: Uuid) -> Result<Trip, Error>;
    async fn update_trip(&self, id: Uuid, update: TripUpdate) -> Result<Trip, Error>;
}

#[async_trait]
pub trait DriverAPI {
    async fn create_driver(&self, input: NewDriver) -> Result<Driver, Error>;
    async fn list_drivers(&self, query: DriverQuery) -> Result<Vec<Driver>, Error>;
    async fn find_driver(&self, id: Uuid) -> Result<Driver, Error>;
}

#[async_trait]
pub trait TruckAPI {
    async fn create_truck(&self, input: NewTruck) -> Result<Truck, Error>;
    async fn list_trucks(&self, query: TruckQuery) -> Result<Vec<Truck>, Error>;
    async fn find_truck(&self, id: Uuid) -> Result<Truck, Error>;
    async fn update_truck_location(
        &self,
        id: Uuid,
        update: LocationUpdate,
    ) -> Result<TruckLocation, Error>;
}

#[async_trait]
pub trait BillingAPI {
    /// Returns the trip's billing record, pricing and storing it on first access.
    async fn find_or_create_billing(&self, trip_id: Uuid) -> Result<Billing, Error>;
    async fn list_customer_billings(&self, email: &str) -> Result<Vec<Billing>, Error>;
    async fn mark_billing_paid(&self, id: Uuid, payment_method: String) -> Result<Billing, Error>;
}

#[async_trait]
pub trait DashboardAPI {
    async fn dashboard(&self, email: &str) -> Result<Dashboard, Error>;
}

#[async_trait]
pub trait ReservationAPI {
    async fn create_reservation(&self, input: NewReservation) -> Result<Reservation, Error>;
    async fn list_reservations(&self, query: ReservationQuery) -> Result<Vec<Reservation>, Error>;
    async fn reservation_stats(&self) -> Result<ReservationStats, Error>;
    async fn find_reservation(&self, id: Uuid) -> Result<Reservation, Error>;
    async fn update_reservation(
        &self,
        id: Uuid,
        update: ReservationUpdate,
    ) -> Result<Reservation, Error>;
    async fn delete_reservation(&self, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait HealthAPI {
    async fn check_health(&self) -> Result<(), Error>;
}

pub trait API:
    CatalogAPI + TripAPI + DriverAPI + TruckAPI + BillingAPI + DashboardAPI + ReservationAPI + HealthAPI
{
}

pub type DynAPI = Arc<dyn API + Send + Sync>;

#[test]
fn page_of_clamps_test() {
    assert_eq!(page_of(None, None), Page::new(0, 100));
    assert_eq!(page_of(Some(0), Some(-5)), Page::new(0, 1));
    assert_eq!(page_of(Some(5000), Some(20)), Page::new(20, 1000));
}
