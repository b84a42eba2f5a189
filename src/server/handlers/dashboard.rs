use axum::extract::{Extension, Json, Path};

use crate::api::DynAPI;
use crate::entities::Dashboard;
use crate::error::Error;

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(email): Path<String>,
) -> Result<Json<Dashboard>, Error> {
    let dashboard = api.dashboard(&email).await?;

    Ok(dashboard.into())
}
