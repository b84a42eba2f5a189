use axum::extract::{Extension, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::api::DynAPI;
use crate::error::Error;

pub async fn banner() -> Json<Value> {
    Json(json!({
        "message": "Echohorn API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
    }))
}

pub async fn check(Extension(api): Extension<DynAPI>) -> Result<Json<Value>, Error> {
    api.check_health().await?;

    Ok(Json(json!({
        "status": "healthy",
        "database": "connected",
        "timestamp": Utc::now(),
    })))
}
