use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::{Collection, Document};
use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub license_number: String,
    pub license_expiry: String,
    pub address: String,
    pub experience: u32,
    pub profile_photo: Option<String>,
    pub rating: f64,
    pub total_trips: u32,
    pub status: AvailabilityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Availability of a fleet asset (driver or truck).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    OnTrip,
}

impl AvailabilityStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::OnTrip => "on_trip",
        }
    }
}

/// Driver registration form. Rating, trip count and status are assigned by
/// the server and cannot be supplied here.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDriver {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 10, max = 20))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5, max = 30))]
    pub license_number: String,
    #[validate(length(min = 1))]
    pub license_expiry: String,
    #[validate(length(min = 10, max = 300))]
    pub address: String,
    #[validate(range(max = 50))]
    pub experience: u32,
    pub profile_photo: Option<String>,
}

impl Driver {
    pub const INITIAL_RATING: f64 = 5.0;

    pub fn new(input: NewDriver) -> Result<Self, Error> {
        input.validate()?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            license_number: input.license_number,
            license_expiry: input.license_expiry,
            address: input.address,
            experience: input.experience,
            profile_photo: input.profile_photo,
            rating: Self::INITIAL_RATING,
            total_trips: 0,
            status: AvailabilityStatus::Available,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Document for Driver {
    const COLLECTION: Collection = Collection::Drivers;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
pub(crate) fn sample_new_driver(name: &str) -> NewDriver {
    NewDriver {
        name: name.into(),
        phone: "9123456780".into(),
        email: "driver@example.com".into(),
        license_number: "MH12-2020-0001".into(),
        license_expiry: "2030-06-30".into(),
        address: "12 Station Road, Pune".into(),
        experience: 7,
        profile_photo: None,
    }
}
