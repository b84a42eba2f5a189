use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::{Collection, Document};
use crate::entities::vehicle;
use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub trip_type: TripType,
    pub pickup_city: String,
    pub drop_city: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub luggage_count: u32,
    pub vehicle_type: String,
    pub vehicle_name: String,
    pub price_per_km: f64,
    pub estimated_distance: Option<f64>,
    pub estimated_fare: Option<f64>,
    pub actual_distance: Option<f64>,
    pub actual_fare: Option<f64>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub notes: Option<String>,
    pub status: Status,
    pub assigned_driver_id: Option<String>,
    pub assigned_truck_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    DropTrip,
    RoundTrip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Confirmed,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl Status {
    /// Statuses of a trip that is booked and not yet finished.
    pub const ACTIVE: [Status; 3] = [Status::Confirmed, Status::Assigned, Status::InProgress];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(invalid_input_error(format!("invalid status: {:?}", s))),
        }
    }
}

/// Booking request as submitted by a customer.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub trip_type: TripType,
    #[validate(length(min = 2, max = 100))]
    pub pickup_city: String,
    #[validate(length(min = 2, max = 100))]
    pub drop_city: String,
    #[validate(length(min = 1))]
    pub pickup_date: String,
    #[validate(length(min = 1))]
    pub pickup_time: String,
    #[validate(range(max = 50))]
    pub luggage_count: u32,
    pub vehicle_type: String,
    #[validate(length(min = 2, max = 100))]
    pub customer_name: String,
    #[validate(length(min = 10, max = 20))]
    pub customer_phone: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(range(min = 0.0, max = 100000.0))]
    pub estimated_distance: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Partial trip update; absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdate {
    pub status: Option<String>,
    pub assigned_driver_id: Option<String>,
    pub assigned_truck_id: Option<String>,
    #[validate(range(min = 0.0, max = 100000.0))]
    pub actual_distance: Option<f64>,
    #[validate(range(min = 0.0, max = 10000000.0))]
    pub actual_fare: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl Trip {
    /// Validates the request against the vehicle catalog and snapshots the
    /// vehicle's name and rate into a new pending trip.
    pub fn new(input: NewTrip) -> Result<Self, Error> {
        input.validate()?;

        let vehicle = vehicle::find(&input.vehicle_type)
            .ok_or_else(|| invalid_input_error("invalid vehicle type"))?;

        let estimated_fare = input
            .estimated_distance
            .map(|d| finite_fare(vehicle.fare_for(d)))
            .transpose()?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            trip_type: input.trip_type,
            pickup_city: input.pickup_city,
            drop_city: input.drop_city,
            pickup_date: input.pickup_date,
            pickup_time: input.pickup_time,
            luggage_count: input.luggage_count,
            vehicle_type: vehicle.key.into(),
            vehicle_name: vehicle.name.into(),
            price_per_km: vehicle.price_per_km,
            estimated_distance: input.estimated_distance,
            estimated_fare,
            actual_distance: None,
            actual_fare: None,
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            customer_email: input.customer_email,
            notes: input.notes,
            status: Status::Pending,
            assigned_driver_id: None,
            assigned_truck_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies the fields present in `update`. Nothing is changed when the
    /// update is invalid.
    pub fn apply(&mut self, update: TripUpdate) -> Result<(), Error> {
        update.validate()?;

        let status = match update.status.as_deref() {
            Some(s) if !s.is_empty() => Some(s.parse::<Status>()?),
            _ => None,
        };
        if let Some(distance) = update.actual_distance {
            finite_fare(distance * self.price_per_km)?;
        }

        if let Some(status) = status {
            self.status = status;
        }
        if let Some(driver_id) = update.assigned_driver_id {
            self.assigned_driver_id = Some(driver_id);
        }
        if let Some(truck_id) = update.assigned_truck_id {
            self.assigned_truck_id = Some(truck_id);
        }
        if let Some(distance) = update.actual_distance {
            self.actual_distance = Some(distance);
        }
        if let Some(fare) = update.actual_fare {
            self.actual_fare = Some(fare);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }

        self.updated_at = Utc::now();

        Ok(())
    }

    /// Distance used for billing: the actual distance when recorded, else the estimate.
    pub fn billable_distance(&self) -> f64 {
        self.actual_distance
            .or(self.estimated_distance)
            .unwrap_or(0.0)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Fares must survive a JSON round trip, which drops non-finite floats.
fn finite_fare(fare: f64) -> Result<f64, Error> {
    if fare.is_finite() {
        Ok(fare)
    } else {
        Err(invalid_input_error("distance too large to price"))
    }
}

impl Document for Trip {
    const COLLECTION: Collection = Collection::Trips;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
pub(crate) fn sample_new_trip(vehicle_type: &str, estimated_distance: Option<f64>) -> NewTrip {
    NewTrip {
        trip_type: TripType::DropTrip,
        pickup_city: "Mumbai".into(),
        drop_city: "Pune".into(),
        pickup_date: "2025-01-15".into(),
        pickup_time: "10:30".into(),
        luggage_count: 2,
        vehicle_type: vehicle_type.into(),
        customer_name: "Asha Rao".into(),
        customer_phone: "9876543210".into(),
        customer_email: "asha@example.com".into(),
        estimated_distance,
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trip_snapshots_vehicle_and_fare_test() {
        let trip = Trip::new(sample_new_trip("sedan", Some(100.0))).unwrap();

        assert_eq!(trip.status, Status::Pending);
        assert_eq!(trip.vehicle_name, "Sedan (4+1)");
        assert_eq!(trip.price_per_km, 14.0);
        assert_eq!(trip.estimated_fare, Some(1400.0));
        assert_eq!(trip.assigned_driver_id, None);
        assert_eq!(trip.assigned_truck_id, None);
        assert_eq!(trip.created_at, trip.updated_at);
    }

    #[test]
    fn new_trip_without_distance_has_no_fare_test() {
        let trip = Trip::new(sample_new_trip("tempo_traveller", None)).unwrap();

        assert_eq!(trip.estimated_fare, None);
        assert_eq!(trip.billable_distance(), 0.0);
    }

    #[test]
    fn new_trip_rejects_unknown_vehicle_test() {
        let err = Trip::new(sample_new_trip("spaceship", Some(10.0))).unwrap_err();
        assert!(err.is_invalid_input_error());
    }

    #[test]
    fn new_trip_rejects_out_of_range_fields_test() {
        let mut input = sample_new_trip("sedan", Some(10.0));
        input.luggage_count = 51;
        assert!(Trip::new(input).unwrap_err().is_invalid_input_error());

        let mut input = sample_new_trip("sedan", Some(-1.0));
        input.customer_email = "not-an-email".into();
        let err = Trip::new(input).unwrap_err();
        assert!(err.message.contains("customer_email"));
        assert!(err.message.contains("estimated_distance"));
    }

    #[test]
    fn new_trip_rejects_unpriceable_distance_test() {
        let err = Trip::new(sample_new_trip("sedan", Some(1e308))).unwrap_err();
        assert!(err.is_invalid_input_error());
        assert!(err.message.contains("estimated_distance"));

        let trip = Trip::new(sample_new_trip("muv_innova", Some(100000.0))).unwrap();
        assert!(trip.estimated_fare.unwrap().is_finite());
    }

    #[test]
    fn apply_unpriceable_distance_changes_nothing_test() {
        let mut trip = Trip::new(sample_new_trip("sedan", Some(10.0))).unwrap();
        let before = trip.clone();

        let update = TripUpdate {
            status: Some("completed".into()),
            actual_distance: Some(1e308),
            ..Default::default()
        };

        assert!(trip.apply(update).unwrap_err().is_invalid_input_error());
        assert_eq!(trip, before);
    }

    #[test]
    fn finite_fare_rejects_overflow_test() {
        assert_eq!(finite_fare(1400.0).unwrap(), 1400.0);
        assert!(finite_fare(f64::INFINITY).unwrap_err().is_invalid_input_error());
        assert!(finite_fare(f64::NAN).unwrap_err().is_invalid_input_error());
    }

    #[test]
    fn apply_invalid_status_changes_nothing_test() {
        let mut trip = Trip::new(sample_new_trip("sedan", Some(10.0))).unwrap();
        let before = trip.clone();

        let update = TripUpdate {
            status: Some("teleported".into()),
            actual_distance: Some(12.0),
            ..Default::default()
        };

        assert!(trip.apply(update).unwrap_err().is_invalid_input_error());
        assert_eq!(trip, before);
    }

    #[test]
    fn apply_only_present_fields_test() {
        let mut trip = Trip::new(sample_new_trip("sedan", Some(10.0))).unwrap();
        let driver_id = Uuid::new_v4().to_string();

        trip.apply(TripUpdate {
            status: Some("assigned".into()),
            assigned_driver_id: Some(driver_id.clone()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(trip.status, Status::Assigned);
        assert!(trip.is_active());
        assert_eq!(trip.assigned_driver_id, Some(driver_id));
        assert_eq!(trip.assigned_truck_id, None);
        assert_eq!(trip.estimated_fare, Some(140.0));

        trip.apply(TripUpdate {
            actual_distance: Some(12.5),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(trip.status, Status::Assigned);
        assert_eq!(trip.billable_distance(), 12.5);
        assert!(trip.updated_at >= trip.created_at);
    }

    #[test]
    fn status_names_round_trip_test() {
        for name in ["pending", "confirmed", "assigned", "in_progress", "completed", "cancelled"] {
            assert_eq!(name.parse::<Status>().unwrap().name(), name);
        }
        assert!(!Status::Completed.is_active());
        assert!(Status::InProgress.is_active());
    }
}
