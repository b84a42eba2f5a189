use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;

use crate::api::{DynAPI, TripQuery};
use crate::entities::{NewTrip, Trip, TripUpdate};
use crate::error::Error;

use super::parse_id;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    payload: Result<Json<NewTrip>, JsonRejection>,
) -> Result<(StatusCode, Json<Trip>), Error> {
    let Json(input) = payload?;
    let trip = api.create_trip(input).await?;

    Ok((StatusCode::CREATED, trip.into()))
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    query: Result<Query<TripQuery>, QueryRejection>,
) -> Result<Json<Vec<Trip>>, Error> {
    let Query(query) = query?;
    let trips = api.list_trips(query).await?;

    Ok(trips.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<Trip>, Error> {
    let trip = api.find_trip(parse_id(&id, "Trip")?).await?;

    Ok(trip.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
    payload: Result<Json<TripUpdate>, JsonRejection>,
) -> Result<Json<Trip>, Error> {
    let id = parse_id(&id, "Trip")?;
    let Json(update) = payload?;
    let trip = api.update_trip(id, update).await?;

    Ok(trip.into())
}
