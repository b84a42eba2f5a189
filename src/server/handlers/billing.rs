use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Json, Path, Query};
use serde::Deserialize;

use crate::api::DynAPI;
use crate::entities::Billing;
use crate::error::Error;

use super::parse_id;

#[derive(Deserialize)]
pub struct PayParams {
    payment_method: String,
}

pub async fn find_or_create(
    Extension(api): Extension<DynAPI>,
    Path(trip_id): Path<String>,
) -> Result<Json<Billing>, Error> {
    let billing = api
        .find_or_create_billing(parse_id(&trip_id, "Trip")?)
        .await?;

    Ok(billing.into())
}

pub async fn list_for_customer(
    Extension(api): Extension<DynAPI>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Billing>>, Error> {
    let billings = api.list_customer_billings(&email).await?;

    Ok(billings.into())
}

pub async fn pay(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
    params: Result<Query<PayParams>, QueryRejection>,
) -> Result<Json<Billing>, Error> {
    let id = parse_id(&id, "Billing")?;
    let Query(params) = params?;
    let billing = api.mark_billing_paid(id, params.payment_method).await?;

    Ok(billing.into())
}
