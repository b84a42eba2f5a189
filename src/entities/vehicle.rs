use serde::Serialize;

use crate::entities::round_cents;
use crate::error::{not_found_error, Error};

/// One class of vehicle offered for booking, with its per-km rate.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleType {
    pub key: &'static str,
    pub name: &'static str,
    pub capacity: &'static str,
    pub allowed_luggage: u32,
    pub price_per_km: f64,
    pub image: &'static str,
}

impl VehicleType {
    /// Fare for the given distance at this vehicle's rate, rounded to cents.
    pub fn fare_for(&self, distance: f64) -> f64 {
        round_cents(distance * self.price_per_km)
    }
}

static CATALOG: [VehicleType; 4] = [
    VehicleType {
        key: "sedan",
        name: "Sedan (4+1)",
        capacity: "4+1",
        allowed_luggage: 30,
        price_per_km: 14.00,
        image: "/img5.png",
    },
    VehicleType {
        key: "muv_innova",
        name: "MUV-Innova (7+1)",
        capacity: "7+1",
        allowed_luggage: 60,
        price_per_km: 19.00,
        image: "/img6.png",
    },
    VehicleType {
        key: "muv_xylo",
        name: "MUV-Xylo (7+1)",
        capacity: "7+1",
        allowed_luggage: 70,
        price_per_km: 18.00,
        image: "/img7.png",
    },
    VehicleType {
        key: "tempo_traveller",
        name: "Tempo Traveller (12+1)",
        capacity: "12+1",
        allowed_luggage: 40,
        price_per_km: 30.00,
        image: "/img8.png",
    },
];

pub fn catalog() -> &'static [VehicleType] {
    &CATALOG
}

pub fn find(key: &str) -> Option<&'static VehicleType> {
    CATALOG.iter().find(|v| v.key == key)
}

pub fn get(key: &str) -> Result<&'static VehicleType, Error> {
    find(key).ok_or_else(|| not_found_error("Vehicle type"))
}
