use serde::Serialize;

use crate::entities::{round_cents, Billing, Driver, Trip, Truck};

/// Read-only overview of one customer's trips and payments.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: Summary,
    pub recent_trips: Vec<Trip>,
    pub recent_billings: Vec<Billing>,
    pub active_trip: Option<Trip>,
    pub truck_details: Option<Truck>,
    pub driver_details: Option<Driver>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_trips: u64,
    pub completed_trips: u64,
    pub total_spent: f64,
    pub pending_payments: u64,
}

/// Sum of the totals of paid billings, rounded to cents.
pub fn total_spent<'a>(billings: impl IntoIterator<Item = &'a Billing>) -> f64 {
    round_cents(
        billings
            .into_iter()
            .filter(|b| b.is_paid())
            .map(|b| b.total_amount)
            .sum(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::trip::sample_new_trip;

    #[test]
    fn total_spent_counts_only_paid_test() {
        let trip = Trip::new(sample_new_trip("sedan", Some(100.0))).unwrap();

        let mut paid = Billing::for_trip(&trip);
        paid.mark_paid("card".into());
        let pending = Billing::for_trip(&trip);
        let mut paid_again = Billing::for_trip(&trip);
        paid_again.mark_paid("cash".into());

        assert_eq!(total_spent(&[paid, pending, paid_again]), 3327.6);
        assert_eq!(total_spent(&Vec::<Billing>::new()), 0.0);
    }
}
