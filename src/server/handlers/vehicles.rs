use axum::extract::{Extension, Json, Path};

use crate::api::DynAPI;
use crate::entities::VehicleType;
use crate::error::Error;

pub async fn list(Extension(api): Extension<DynAPI>) -> Json<Vec<VehicleType>> {
    api.list_vehicles().into()
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(key): Path<String>,
) -> Result<Json<VehicleType>, Error> {
    let vehicle = api.find_vehicle(&key)?;

    Ok(vehicle.into())
}
