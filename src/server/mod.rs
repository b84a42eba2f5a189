mod handlers;

use std::net::SocketAddr;

use axum::{
    extract::Extension,
    routing::{get, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::DynAPI;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{
    billing, cities, dashboard, drivers, health, reservations, trips, trucks, vehicles,
};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/", get(health::banner))
        .route("/api/health", get(health::check))
        .route("/api/vehicles", get(vehicles::list))
        .route("/api/vehicles/:key", get(vehicles::find))
        .route("/api/cities", get(cities::list))
        .route("/api/trips", get(trips::list).post(trips::create))
        .route("/api/trips/:id", get(trips::find).put(trips::update))
        .route("/api/drivers", get(drivers::list).post(drivers::create))
        .route("/api/drivers/:id", get(drivers::find))
        .route("/api/trucks", get(trucks::list).post(trucks::create))
        .route("/api/trucks/:id", get(trucks::find))
        .route("/api/trucks/:id/location", put(trucks::update_location))
        .route("/api/billing/customer/:email", get(billing::list_for_customer))
        .route("/api/billing/:id", get(billing::find_or_create))
        .route("/api/billing/:id/pay", put(billing::pay))
        .route("/api/dashboard/:email", get(dashboard::find))
        .route(
            "/api/reservations",
            get(reservations::list).post(reservations::create),
        )
        .route("/api/reservations/stats", get(reservations::stats))
        .route(
            "/api/reservations/:id",
            get(reservations::find)
                .put(reservations::update)
                .delete(reservations::delete),
        )
        .layer(Extension(api))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(api: DynAPI, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| unexpected_error(format!("server error: {}", err)))
}
