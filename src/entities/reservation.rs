use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::db::{Collection, Document};
use crate::error::{invalid_input_error, Error};

/// A prospective customer's trial-booking inquiry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub fleet_size: Option<String>,
    pub message: Option<String>,
    pub notes: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Contacted,
    Completed,
    Cancelled,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "contacted" => Ok(Self::Contacted),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(invalid_input_error(format!("invalid status: {:?}", s))),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 10, max = 20), custom = "validate_phone_digits")]
    pub phone: String,
    #[validate(length(min = 2, max = 100))]
    pub company: String,
    pub fleet_size: Option<String>,
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationUpdate {
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReservationStats {
    pub total: u64,
    pub pending: u64,
    pub contacted: u64,
    pub completed: u64,
    pub recent: Vec<Reservation>,
}

/// Phone numbers need at least ten digits once separators are stripped.
pub fn validate_phone_digits(phone: &str) -> Result<(), ValidationError> {
    if phone.chars().filter(char::is_ascii_digit).count() < 10 {
        return Err(ValidationError::new("phone_digits"));
    }

    Ok(())
}

impl Reservation {
    pub fn new(input: NewReservation) -> Result<Self, Error> {
        input.validate()?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            company: input.company,
            fleet_size: input.fleet_size,
            message: input.message,
            notes: None,
            status: Status::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, update: ReservationUpdate) -> Result<(), Error> {
        let status = match update.status.as_deref() {
            Some(s) if !s.is_empty() => Some(s.parse::<Status>()?),
            _ => None,
        };

        if let Some(status) = status {
            self.status = status;
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }

        self.updated_at = Utc::now();

        Ok(())
    }
}

impl Document for Reservation {
    const COLLECTION: Collection = Collection::Reservations;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
pub(crate) fn sample_new_reservation(phone: &str) -> NewReservation {
    NewReservation {
        name: "Meera Shah".into(),
        email: "meera@logistics.example".into(),
        phone: phone.into(),
        company: "Shah Logistics".into(),
        fleet_size: Some("10-50".into()),
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_digit_rule_test() {
        assert!(validate_phone_digits("98-76 543 210").is_ok());
        assert!(validate_phone_digits("+91 98765 43210").is_ok());
        assert!(validate_phone_digits("12345").is_err());
        assert!(validate_phone_digits("(123) 456-78--").is_err());
    }

    #[test]
    fn new_reservation_phone_test() {
        let reservation = Reservation::new(sample_new_reservation("98-76 543 210")).unwrap();
        assert_eq!(reservation.status, Status::Pending);
        assert_eq!(reservation.phone, "98-76 543 210");

        let err = Reservation::new(sample_new_reservation("12345")).unwrap_err();
        assert!(err.is_invalid_input_error());
        assert!(err.message.contains("phone"));

        // long enough but too few digits
        let err = Reservation::new(sample_new_reservation("phone: 12-34-56")).unwrap_err();
        assert!(err.is_invalid_input_error());
    }

    #[test]
    fn apply_update_test() {
        let mut reservation = Reservation::new(sample_new_reservation("9876543210")).unwrap();

        reservation
            .apply(ReservationUpdate {
                status: Some("contacted".into()),
                notes: Some("called back".into()),
            })
            .unwrap();
        assert_eq!(reservation.status.name(), "contacted");
        assert_eq!(reservation.notes.as_deref(), Some("called back"));

        let err = reservation
            .apply(ReservationUpdate {
                status: Some("archived".into()),
                notes: None,
            })
            .unwrap_err();
        assert!(err.is_invalid_input_error());
        assert_eq!(reservation.status, Status::Contacted);
    }
}
