use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::{Collection, Document};
use crate::entities::{vehicle, AvailabilityStatus, Driver};
use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truck {
    pub id: Uuid,
    pub vehicle_type: String,
    pub vehicle_name: String,
    pub registration_number: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub insurance_number: String,
    pub insurance_expiry: String,
    pub fitness_expiry: String,
    /// Kept as given; it need not name a registered driver.
    pub driver_id: Option<String>,
    /// Driver's name as it was when the truck was registered.
    pub driver_name: Option<String>,
    pub owner_id: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub status: AvailabilityStatus,
    pub current_location: Option<TruckLocation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTruck {
    pub vehicle_type: String,
    #[validate(length(min = 5, max = 20))]
    pub registration_number: String,
    #[validate(length(min = 2, max = 100))]
    pub model: String,
    #[validate(range(min = 1990, max = 2030))]
    pub year: i32,
    #[validate(length(min = 2, max = 30))]
    pub color: String,
    #[validate(length(min = 5, max = 50))]
    pub insurance_number: String,
    #[validate(length(min = 1))]
    pub insurance_expiry: String,
    #[validate(length(min = 1))]
    pub fitness_expiry: String,
    pub driver_id: Option<String>,
    #[validate(length(min = 1))]
    pub owner_id: String,
    #[validate(length(min = 2, max = 100))]
    pub owner_name: String,
    #[validate(length(min = 10, max = 20))]
    pub owner_phone: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = 0.0, max = 360.0))]
    pub heading: Option<f64>,
    #[validate(range(min = 0.0))]
    pub speed: Option<f64>,
}

impl NewTruck {
    /// Checks the form and the vehicle type before any lookup happens.
    pub fn check(&self) -> Result<&'static vehicle::VehicleType, Error> {
        self.validate()?;

        vehicle::find(&self.vehicle_type).ok_or_else(|| invalid_input_error("invalid vehicle type"))
    }
}

impl Truck {
    /// `driver` is the record resolved from `input.driver_id`, if it exists.
    pub fn new(input: NewTruck, driver: Option<&Driver>) -> Result<Self, Error> {
        let vehicle = input.check()?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            vehicle_type: vehicle.key.into(),
            vehicle_name: vehicle.name.into(),
            registration_number: input.registration_number,
            model: input.model,
            year: input.year,
            color: input.color,
            insurance_number: input.insurance_number,
            insurance_expiry: input.insurance_expiry,
            fitness_expiry: input.fitness_expiry,
            driver_id: input.driver_id,
            driver_name: driver.map(|d| d.name.clone()),
            owner_id: input.owner_id,
            owner_name: input.owner_name,
            owner_phone: input.owner_phone,
            status: AvailabilityStatus::Available,
            current_location: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the current location wholesale; no history is kept.
    pub fn relocate(&mut self, update: LocationUpdate) -> Result<&TruckLocation, Error> {
        update.validate()?;

        let now = Utc::now();

        self.updated_at = now;

        Ok(self.current_location.insert(TruckLocation {
            latitude: update.latitude,
            longitude: update.longitude,
            heading: update.heading,
            speed: update.speed,
            updated_at: now,
        }))
    }
}

impl Document for Truck {
    const COLLECTION: Collection = Collection::Trucks;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
pub(crate) fn sample_new_truck(vehicle_type: &str, driver_id: Option<Uuid>) -> NewTruck {
    NewTruck {
        vehicle_type: vehicle_type.into(),
        registration_number: "MH12AB1234".into(),
        model: "Toyota Innova".into(),
        year: 2021,
        color: "White".into(),
        insurance_number: "INS-445566".into(),
        insurance_expiry: "2026-03-31".into(),
        fitness_expiry: "2027-03-31".into(),
        driver_id: driver_id.map(|id| id.to_string()),
        owner_id: "owner-1".into(),
        owner_name: "Fleet Owner".into(),
        owner_phone: "9988776655".into(),
    }
}
