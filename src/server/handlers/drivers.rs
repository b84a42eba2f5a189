use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;

use crate::api::{DriverQuery, DynAPI};
use crate::entities::{Driver, NewDriver};
use crate::error::Error;

use super::parse_id;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    payload: Result<Json<NewDriver>, JsonRejection>,
) -> Result<(StatusCode, Json<Driver>), Error> {
    let Json(input) = payload?;
    let driver = api.create_driver(input).await?;

    Ok((StatusCode::CREATED, driver.into()))
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    query: Result<Query<DriverQuery>, QueryRejection>,
) -> Result<Json<Vec<Driver>>, Error> {
    let Query(query) = query?;
    let drivers = api.list_drivers(query).await?;

    Ok(drivers.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, Error> {
    let driver = api.find_driver(parse_id(&id, "Driver")?).await?;

    Ok(driver.into())
}
