pub mod billing;
pub mod cities;
pub mod dashboard;
pub mod drivers;
pub mod health;
pub mod reservations;
pub mod trips;
pub mod trucks;
pub mod vehicles;

use uuid::Uuid;

use crate::error::{not_found_error, Error};

/// A path segment that is not a UUID cannot name any stored record.
fn parse_id(raw: &str, resource: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| not_found_error(resource))
}

#[test]
fn parse_id_test() {
    let id = Uuid::new_v4();

    assert_eq!(parse_id(&id.to_string(), "Trip").unwrap(), id);

    let err = parse_id("not-a-uuid", "Trip").unwrap_err();
    assert!(err.is_not_found_error());
    assert_eq!(err.message, "Trip not found");
}
