use super::Engine;

use crate::{
    api::CatalogAPI,
    entities::{city, vehicle, VehicleType},
    error::Error,
};

impl CatalogAPI for Engine {
    fn list_vehicles(&self) -> Vec<VehicleType> {
        vehicle::catalog().to_vec()
    }

    fn find_vehicle(&self, key: &str) -> Result<VehicleType, Error> {
        vehicle::get(key).cloned()
    }

    fn list_cities(&self) -> Vec<&'static str> {
        city::sorted()
    }
}
