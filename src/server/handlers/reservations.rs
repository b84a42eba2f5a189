use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use crate::api::{DynAPI, ReservationQuery};
use crate::entities::{NewReservation, Reservation, ReservationStats, ReservationUpdate};
use crate::error::Error;

use super::parse_id;

#[derive(Serialize)]
pub struct Deleted {
    message: &'static str,
    id: Uuid,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    payload: Result<Json<NewReservation>, JsonRejection>,
) -> Result<(StatusCode, Json<Reservation>), Error> {
    let Json(input) = payload?;
    let reservation = api.create_reservation(input).await?;

    Ok((StatusCode::CREATED, reservation.into()))
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    query: Result<Query<ReservationQuery>, QueryRejection>,
) -> Result<Json<Vec<Reservation>>, Error> {
    let Query(query) = query?;
    let reservations = api.list_reservations(query).await?;

    Ok(reservations.into())
}

pub async fn stats(Extension(api): Extension<DynAPI>) -> Result<Json<ReservationStats>, Error> {
    let stats = api.reservation_stats().await?;

    Ok(stats.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, Error> {
    let reservation = api
        .find_reservation(parse_id(&id, "Reservation")?)
        .await?;

    Ok(reservation.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
    payload: Result<Json<ReservationUpdate>, JsonRejection>,
) -> Result<Json<Reservation>, Error> {
    let id = parse_id(&id, "Reservation")?;
    let Json(update) = payload?;
    let reservation = api.update_reservation(id, update).await?;

    Ok(reservation.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, Error> {
    let id = parse_id(&id, "Reservation")?;

    api.delete_reservation(id).await?;

    Ok(Deleted {
        message: "Reservation deleted successfully",
        id,
    }
    .into())
}
