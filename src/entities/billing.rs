use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{Collection, Document};
use crate::entities::{round_cents, Trip};

/// Flat charge per piece of luggage.
pub const LUGGAGE_FEE: f64 = 5.0;

/// GST applied to fare plus luggage.
pub const TAX_RATE: f64 = 0.18;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billing {
    pub id: Uuid,
    pub trip_id: Uuid,
    /// Customer email of the billed trip.
    pub customer_id: String,
    pub customer_name: String,
    pub vehicle_name: String,
    pub distance: f64,
    pub base_fare: f64,
    pub luggage_charge: f64,
    pub taxes: f64,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl Billing {
    /// Prices a trip using the rate snapshotted on the trip at booking time.
    pub fn for_trip(trip: &Trip) -> Self {
        let distance = trip.billable_distance();
        let base_fare = round_cents(distance * trip.price_per_km);
        let luggage_charge = round_cents(trip.luggage_count as f64 * LUGGAGE_FEE);
        let subtotal = base_fare + luggage_charge;
        let taxes = round_cents(subtotal * TAX_RATE);

        Self {
            id: Uuid::new_v4(),
            trip_id: trip.id,
            customer_id: trip.customer_email.clone(),
            customer_name: trip.customer_name.clone(),
            vehicle_name: trip.vehicle_name.clone(),
            distance,
            base_fare,
            luggage_charge,
            taxes,
            total_amount: round_cents(subtotal + taxes),
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn mark_paid(&mut self, payment_method: String) {
        self.payment_status = PaymentStatus::Paid;
        self.payment_method = Some(payment_method);
        self.paid_at = Some(Utc::now());
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

impl Document for Billing {
    const COLLECTION: Collection = Collection::Billings;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::trip::sample_new_trip;
    use crate::entities::TripUpdate;

    #[test]
    fn billing_from_estimate_test() {
        // sedan, 100 km, 2 bags
        let trip = Trip::new(sample_new_trip("sedan", Some(100.0))).unwrap();
        let billing = Billing::for_trip(&trip);

        assert_eq!(billing.trip_id, trip.id);
        assert_eq!(billing.customer_id, "asha@example.com");
        assert_eq!(billing.distance, 100.0);
        assert_eq!(billing.base_fare, 1400.0);
        assert_eq!(billing.luggage_charge, 10.0);
        assert_eq!(billing.taxes, 253.8);
        assert_eq!(billing.total_amount, 1663.8);
        assert_eq!(billing.payment_status, PaymentStatus::Pending);
        assert_eq!(billing.paid_at, None);
    }

    #[test]
    fn billing_prefers_actual_distance_test() {
        let mut trip = Trip::new(sample_new_trip("muv_xylo", Some(100.0))).unwrap();
        trip.apply(TripUpdate {
            actual_distance: Some(120.5),
            ..Default::default()
        })
        .unwrap();

        let billing = Billing::for_trip(&trip);

        assert_eq!(billing.distance, 120.5);
        assert_eq!(billing.base_fare, 2169.0);
    }

    #[test]
    fn billing_without_any_distance_test() {
        let mut input = sample_new_trip("tempo_traveller", None);
        input.luggage_count = 3;
        let billing = Billing::for_trip(&Trip::new(input).unwrap());

        assert_eq!(billing.distance, 0.0);
        assert_eq!(billing.base_fare, 0.0);
        assert_eq!(billing.luggage_charge, 15.0);
        assert_eq!(billing.taxes, 2.7);
        assert_eq!(billing.total_amount, 17.7);
    }

    #[test]
    fn total_is_subtotal_plus_rounded_tax_test() {
        for (vehicle, distance, luggage) in [
            ("sedan", 33.33, 1),
            ("muv_innova", 7.77, 0),
            ("muv_xylo", 250.0, 50),
            ("tempo_traveller", 0.01, 4),
        ] {
            let mut input = sample_new_trip(vehicle, Some(distance));
            input.luggage_count = luggage;
            let billing = Billing::for_trip(&Trip::new(input).unwrap());

            let subtotal = billing.base_fare + billing.luggage_charge;
            assert_eq!(billing.taxes, round_cents(subtotal * TAX_RATE));
            assert!((billing.total_amount - (subtotal + billing.taxes)).abs() < 0.005);
        }
    }

    #[test]
    fn mark_paid_test() {
        let trip = Trip::new(sample_new_trip("sedan", Some(10.0))).unwrap();
        let mut billing = Billing::for_trip(&trip);

        billing.mark_paid("upi".into());

        assert!(billing.is_paid());
        assert_eq!(billing.payment_method.as_deref(), Some("upi"));
        assert!(billing.paid_at.is_some());
    }
}
