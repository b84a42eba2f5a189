pub mod billing;
pub mod city;
pub mod dashboard;
pub mod driver;
pub mod reservation;
pub mod trip;
pub mod truck;
pub mod vehicle;

pub use billing::{Billing, PaymentStatus};
pub use dashboard::{Dashboard, Summary};
pub use driver::{AvailabilityStatus, Driver, NewDriver};
pub use reservation::{
    NewReservation, Reservation, ReservationStats, ReservationUpdate, Status as ReservationStatus,
};
pub use trip::{NewTrip, Status as TripStatus, Trip, TripType, TripUpdate};
pub use truck::{LocationUpdate, NewTruck, Truck, TruckLocation};
pub use vehicle::VehicleType;

/// Rounds a monetary amount to two decimal places, half away from zero.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[test]
fn round_cents_test() {
    assert_eq!(round_cents(1400.0), 1400.0);
    assert_eq!(round_cents(253.8), 253.8);
    assert_eq!(round_cents(0.125), 0.13);
    assert_eq!(round_cents(-0.125), -0.13);
}
