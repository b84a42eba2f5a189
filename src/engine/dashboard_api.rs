use super::helpers::{fetch_all, fetch_one, fetch_referenced};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::DashboardAPI,
    db::{Collection, Filter, Page},
    entities::{
        dashboard, Billing, Dashboard, Driver, PaymentStatus, Summary, Trip, TripStatus, Truck,
    },
    error::Error,
};

const RECENT_LIMIT: u64 = 10;

#[async_trait]
impl DashboardAPI for Engine {
    #[tracing::instrument(skip(self, email))]
    async fn dashboard(&self, email: &str) -> Result<Dashboard, Error> {
        let store = self.store();

        let trips = Filter::new().eq("customerEmail", email);
        let completed = trips.clone().eq("status", TripStatus::Completed.name());
        let active = trips
            .clone()
            .any_of("status", TripStatus::ACTIVE.iter().map(|s| s.name()));

        let billings = Filter::new().eq("customerId", email);
        let paid = billings.clone().eq("paymentStatus", PaymentStatus::Paid.name());
        let pending = billings
            .clone()
            .eq("paymentStatus", PaymentStatus::Pending.name());

        let (
            recent_trips,
            recent_billings,
            total_trips,
            completed_trips,
            paid_billings,
            pending_payments,
            active_trip,
        ) = futures::try_join!(
            fetch_all::<Trip>(store, &trips, Page::first(RECENT_LIMIT)),
            fetch_all::<Billing>(store, &billings, Page::first(RECENT_LIMIT)),
            store.count(Collection::Trips, &trips),
            store.count(Collection::Trips, &completed),
            fetch_all::<Billing>(store, &paid, Page::all()),
            store.count(Collection::Billings, &pending),
            fetch_one::<Trip>(store, &active),
        )?;

        // the newest active trip wins when there are several
        let (truck_details, driver_details) = match &active_trip {
            Some(trip) => futures::try_join!(
                fetch_referenced::<Truck>(store, trip.assigned_truck_id.as_deref()),
                fetch_referenced::<Driver>(store, trip.assigned_driver_id.as_deref()),
            )?,
            None => (None, None),
        };

        Ok(Dashboard {
            summary: Summary {
                total_trips,
                completed_trips,
                total_spent: dashboard::total_spent(&paid_billings),
                pending_payments,
            },
            recent_trips,
            recent_billings,
            active_trip,
            truck_details,
            driver_details,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{BillingAPI, DashboardAPI, DriverAPI, TripAPI, TruckAPI};
    use crate::engine::test_engine;
    use crate::entities::driver::sample_new_driver;
    use crate::entities::trip::sample_new_trip;
    use crate::entities::truck::sample_new_truck;
    use crate::entities::TripUpdate;

    #[tokio::test]
    async fn empty_dashboard_test() {
        let (engine, _) = test_engine();

        let dashboard = engine.dashboard("nobody@example.com").await.unwrap();

        assert_eq!(dashboard.summary.total_trips, 0);
        assert_eq!(dashboard.summary.total_spent, 0.0);
        assert!(dashboard.recent_trips.is_empty());
        assert!(dashboard.active_trip.is_none());
        assert!(dashboard.truck_details.is_none());
        assert!(dashboard.driver_details.is_none());
    }

    #[tokio::test]
    async fn dashboard_summary_test() {
        let (engine, _) = test_engine();

        let done = engine
            .create_trip(sample_new_trip("sedan", Some(100.0)))
            .await
            .unwrap();
        let open = engine
            .create_trip(sample_new_trip("sedan", Some(10.0)))
            .await
            .unwrap();
        let mut foreign = sample_new_trip("sedan", Some(50.0));
        foreign.customer_email = "someone@else.com".into();
        engine.create_trip(foreign).await.unwrap();

        engine
            .update_trip(
                done.id,
                TripUpdate {
                    status: Some("completed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let paid = engine.find_or_create_billing(done.id).await.unwrap();
        engine
            .mark_billing_paid(paid.id, "card".into())
            .await
            .unwrap();
        engine.find_or_create_billing(open.id).await.unwrap();

        let dashboard = engine.dashboard(&done.customer_email).await.unwrap();

        assert_eq!(dashboard.summary.total_trips, 2);
        assert_eq!(dashboard.summary.completed_trips, 1);
        assert_eq!(dashboard.summary.total_spent, 1663.8);
        assert_eq!(dashboard.summary.pending_payments, 1);
        assert_eq!(dashboard.recent_trips.len(), 2);
        assert_eq!(dashboard.recent_billings.len(), 2);
        assert!(dashboard.active_trip.is_none());
    }

    #[tokio::test]
    async fn active_trip_resolves_assignments_test() {
        let (engine, _) = test_engine();

        let driver = engine
            .create_driver(sample_new_driver("Arjun Patel"))
            .await
            .unwrap();
        let truck = engine
            .create_truck(sample_new_truck("sedan", Some(driver.id)))
            .await
            .unwrap();
        let trip = engine
            .create_trip(sample_new_trip("sedan", Some(100.0)))
            .await
            .unwrap();

        engine
            .update_trip(
                trip.id,
                TripUpdate {
                    status: Some("assigned".into()),
                    assigned_driver_id: Some(driver.id.to_string()),
                    assigned_truck_id: Some(truck.id.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let dashboard = engine.dashboard(&trip.customer_email).await.unwrap();

        assert_eq!(dashboard.active_trip.map(|t| t.id), Some(trip.id));
        assert_eq!(dashboard.truck_details, Some(truck));
        assert_eq!(dashboard.driver_details, Some(driver));
    }

    #[tokio::test]
    async fn opaque_assignments_resolve_to_nothing_test() {
        let (engine, _) = test_engine();
        let trip = engine
            .create_trip(sample_new_trip("sedan", Some(20.0)))
            .await
            .unwrap();

        engine
            .update_trip(
                trip.id,
                TripUpdate {
                    status: Some("in_progress".into()),
                    assigned_driver_id: Some("driver-42".into()),
                    assigned_truck_id: Some("MH-12-AB-1234".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let dashboard = engine.dashboard(&trip.customer_email).await.unwrap();
        let active = dashboard.active_trip.unwrap();

        assert_eq!(active.assigned_driver_id.as_deref(), Some("driver-42"));
        assert!(dashboard.truck_details.is_none());
        assert!(dashboard.driver_details.is_none());
    }
}
