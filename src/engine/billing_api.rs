use super::helpers::{fetch, fetch_all, fetch_one, insert, replace};
use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::{BillingAPI, TripAPI},
    db::{Filter, Page},
    entities::Billing,
    error::{invalid_input_error, not_found_error, unexpected_error, Error},
};

/// Most billing records returned for one customer.
const CUSTOMER_BILLINGS_LIMIT: u64 = 100;

#[async_trait]
impl BillingAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_or_create_billing(&self, trip_id: Uuid) -> Result<Billing, Error> {
        let trip = self.find_trip(trip_id).await?;
        let filter = Filter::new().eq("tripId", trip_id.to_string());

        if let Some(billing) = fetch_one::<Billing>(self.store(), &filter).await? {
            return Ok(billing);
        }

        let billing = Billing::for_trip(&trip);

        match insert(self.store(), &billing).await {
            Ok(()) => {
                tracing::info!(billing_id = %billing.id, total = billing.total_amount, "billing created");
                Ok(billing)
            }
            Err(err) if err.is_conflict_error() => {
                // a concurrent request stored the record first
                tracing::info!("billing already created, returning stored record");
                fetch_one(self.store(), &filter)
                    .await?
                    .ok_or_else(|| unexpected_error("billing vanished after conflict"))
            }
            Err(err) => Err(err),
        }
    }

    #[tracing::instrument(skip(self, email))]
    async fn list_customer_billings(&self, email: &str) -> Result<Vec<Billing>, Error> {
        let filter = Filter::new().eq("customerId", email);

        fetch_all(self.store(), &filter, Page::first(CUSTOMER_BILLINGS_LIMIT)).await
    }

    #[tracing::instrument(skip(self))]
    async fn mark_billing_paid(&self, id: Uuid, payment_method: String) -> Result<Billing, Error> {
        if payment_method.trim().is_empty() {
            return Err(invalid_input_error("payment_method is required"));
        }

        let mut billing: Billing = fetch(self.store(), &id)
            .await?
            .ok_or_else(|| not_found_error("Billing"))?;

        billing.mark_paid(payment_method);

        if !replace(self.store(), &billing).await? {
            return Err(not_found_error("Billing"));
        }

        tracing::info!(total = billing.total_amount, "billing paid");

        Ok(billing)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{BillingAPI, TripAPI};
    use crate::engine::{helpers::insert, test_engine};
    use crate::entities::trip::sample_new_trip;
    use crate::entities::{Billing, PaymentStatus, TripUpdate};
    use uuid::Uuid;

    #[tokio::test]
    async fn billing_is_priced_from_trip_test() {
        let (engine, _) = test_engine();
        let trip = engine
            .create_trip(sample_new_trip("sedan", Some(100.0)))
            .await
            .unwrap();

        let billing = engine.find_or_create_billing(trip.id).await.unwrap();

        assert_eq!(billing.trip_id, trip.id);
        assert_eq!(billing.customer_id, trip.customer_email);
        assert_eq!(billing.base_fare, 1400.0);
        assert_eq!(billing.luggage_charge, 10.0);
        assert_eq!(billing.taxes, 253.8);
        assert_eq!(billing.total_amount, 1663.8);
        assert_eq!(billing.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn billing_is_created_once_test() {
        let (engine, _) = test_engine();
        let trip = engine
            .create_trip(sample_new_trip("sedan", Some(100.0)))
            .await
            .unwrap();

        let first = engine.find_or_create_billing(trip.id).await.unwrap();

        engine
            .update_trip(
                trip.id,
                TripUpdate {
                    actual_distance: Some(250.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let second = engine.find_or_create_billing(trip.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            engine
                .list_customer_billings(&trip.customer_email)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn conflicting_insert_returns_stored_billing_test() {
        let (engine, store) = test_engine();
        let trip = engine
            .create_trip(sample_new_trip("sedan", Some(100.0)))
            .await
            .unwrap();

        let winner = Billing::for_trip(&trip);
        insert(store.as_ref(), &winner).await.unwrap();

        let err = insert(store.as_ref(), &Billing::for_trip(&trip))
            .await
            .unwrap_err();
        assert!(err.is_conflict_error());

        assert_eq!(engine.find_or_create_billing(trip.id).await.unwrap(), winner);
    }

    #[tokio::test]
    async fn billing_for_missing_trip_test() {
        let (engine, _) = test_engine();

        assert!(engine
            .find_or_create_billing(Uuid::new_v4())
            .await
            .unwrap_err()
            .is_not_found_error());
    }

    #[tokio::test]
    async fn mark_billing_paid_test() {
        let (engine, _) = test_engine();
        let trip = engine
            .create_trip(sample_new_trip("sedan", Some(10.0)))
            .await
            .unwrap();
        let billing = engine.find_or_create_billing(trip.id).await.unwrap();

        let paid = engine
            .mark_billing_paid(billing.id, "upi".into())
            .await
            .unwrap();

        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.payment_method.as_deref(), Some("upi"));
        assert!(paid.paid_at.is_some());
        assert_eq!(engine.find_or_create_billing(trip.id).await.unwrap(), paid);

        assert!(engine
            .mark_billing_paid(Uuid::new_v4(), "upi".into())
            .await
            .unwrap_err()
            .is_not_found_error());
    }
}
