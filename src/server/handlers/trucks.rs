use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;
use serde::Serialize;

use crate::api::{DynAPI, TruckQuery};
use crate::entities::{LocationUpdate, NewTruck, Truck, TruckLocation};
use crate::error::Error;

use super::parse_id;

#[derive(Serialize)]
pub struct LocationUpdated {
    message: &'static str,
    location: TruckLocation,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    payload: Result<Json<NewTruck>, JsonRejection>,
) -> Result<(StatusCode, Json<Truck>), Error> {
    let Json(input) = payload?;
    let truck = api.create_truck(input).await?;

    Ok((StatusCode::CREATED, truck.into()))
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    query: Result<Query<TruckQuery>, QueryRejection>,
) -> Result<Json<Vec<Truck>>, Error> {
    let Query(query) = query?;
    let trucks = api.list_trucks(query).await?;

    Ok(trucks.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<Truck>, Error> {
    let truck = api.find_truck(parse_id(&id, "Truck")?).await?;

    Ok(truck.into())
}

pub async fn update_location(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
    payload: Result<Json<LocationUpdate>, JsonRejection>,
) -> Result<Json<LocationUpdated>, Error> {
    let id = parse_id(&id, "Truck")?;
    let Json(update) = payload?;
    let location = api.update_truck_location(id, update).await?;

    Ok(LocationUpdated {
        message: "Location updated",
        location,
    }
    .into())
}
