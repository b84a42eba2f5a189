use axum::extract::{Extension, Json};

use crate::api::DynAPI;

pub async fn list(Extension(api): Extension<DynAPI>) -> Json<Vec<&'static str>> {
    api.list_cities().into()
}
