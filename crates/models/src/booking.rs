use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::validation::{self, Payload, ValidationErrors};

/// Longest guest name a booking may have, in characters
pub const NAME_MAX_LENGTH: usize = 255;

/// Canonical wire format of a booking date
pub const BOOKING_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A table reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Booking {
    /// Assigned by the store on creation
    pub id: i32,
    /// Name the table is booked under
    pub name: String,
    pub number_of_guests: i32,
    #[serde(with = "booking_date")]
    #[cfg_attr(
        feature = "openapi",
        schema(value_type = String, example = "2025-04-01T18:30:00")
    )]
    pub booking_date: NaiveDateTime,
}

impl Display for Booking {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name)
    }
}

/// Every writable field of a booking, validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingFields {
    pub name: String,
    pub number_of_guests: i32,
    #[serde(with = "booking_date")]
    #[cfg_attr(
        feature = "openapi",
        schema(value_type = String, example = "2025-04-01T18:30:00")
    )]
    pub booking_date: NaiveDateTime,
}

impl BookingFields {
    pub fn from_payload(payload: Payload) -> Result<Self, ValidationErrors> {
        match BookingChanges::read(payload, true) {
            (
                BookingChanges {
                    name: Some(name),
                    number_of_guests: Some(number_of_guests),
                    booking_date: Some(booking_date),
                },
                errors,
            ) if errors.is_empty() => Ok(Self {
                name,
                number_of_guests,
                booking_date,
            }),
            (_, errors) => Err(errors),
        }
    }

    pub fn with_id(self, id: i32) -> Booking {
        Booking {
            id,
            name: self.name,
            number_of_guests: self.number_of_guests,
            booking_date: self.booking_date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingChanges {
    pub name: Option<String>,
    pub number_of_guests: Option<i32>,
    pub booking_date: Option<NaiveDateTime>,
}

impl BookingChanges {
    pub fn from_payload(payload: Payload) -> Result<Self, ValidationErrors> {
        let (changes, errors) = Self::read(payload, false);
        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.number_of_guests.is_none() && self.booking_date.is_none()
    }

    pub fn apply(self, booking: Booking) -> Booking {
        Booking {
            id: booking.id,
            name: self.name.unwrap_or(booking.name),
            number_of_guests: self.number_of_guests.unwrap_or(booking.number_of_guests),
            booking_date: self.booking_date.unwrap_or(booking.booking_date),
        }
    }

    fn read(mut payload: Payload, required: bool) -> (Self, ValidationErrors) {
        let mut errors = ValidationErrors::new();

        let name = payload.take("name", required, &mut errors, |v| {
            validation::text(v, NAME_MAX_LENGTH)
        });
        let number_of_guests = payload.take("number_of_guests", required, &mut errors, |v| {
            validation::integer(v, 1)
        });
        let booking_date = payload.take("booking_date", required, &mut errors, validation::date_time);

        (
            Self {
                name,
                number_of_guests,
                booking_date,
            },
            errors,
        )
    }
}

/// Serde adapter writing [`BOOKING_DATE_FORMAT`] and reading any accepted input format
mod booking_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use serde_json::Value;

    use super::BOOKING_DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(BOOKING_DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let value = Value::deserialize(deserializer)?;
        crate::validation::date_time(value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    fn payload(value: Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_from_payload() {
        let fields = BookingFields::from_payload(payload(json!({
            "name": "John Doe",
            "number_of_guests": 4,
            "booking_date": "2025-04-01 18:30:00"
        })))
        .unwrap();

        assert_eq!(fields.name, "John Doe");
        assert_eq!(fields.number_of_guests, 4);
        assert_eq!(fields.booking_date, at(18, 30));
    }

    #[test]
    fn test_plain_date_is_midnight() {
        let fields = BookingFields::from_payload(payload(json!({
            "name": "Jane Smith",
            "number_of_guests": 2,
            "booking_date": "2025-04-01"
        })))
        .unwrap();

        assert_eq!(fields.booking_date, at(0, 0));
    }

    #[test]
    fn test_rejects_zero_guests_and_bad_date() {
        let errors = BookingFields::from_payload(payload(json!({
            "name": "Alice Johnson",
            "number_of_guests": 0,
            "booking_date": "tomorrow"
        })))
        .unwrap_err();

        assert_eq!(
            errors.field("number_of_guests"),
            Some(&["Ensure this value is greater than or equal to 1.".to_string()][..])
        );
        assert_eq!(
            errors.field("booking_date"),
            Some(&[validation::INVALID_DATETIME.to_string()][..])
        );
        assert_eq!(errors.field("name"), None);
    }

    #[test]
    fn test_missing_fields() {
        let errors = BookingFields::from_payload(payload(json!({ "name": "" }))).unwrap_err();

        assert_eq!(
            errors.field("name"),
            Some(&[validation::BLANK.to_string()][..])
        );
        assert!(errors.field("number_of_guests").is_some());
        assert!(errors.field("booking_date").is_some());
    }

    #[test]
    fn test_changes_apply_only_present_fields() {
        let booking = Booking {
            id: 7,
            name: "Bob Marley".to_string(),
            number_of_guests: 5,
            booking_date: at(21, 0),
        };

        let changes = BookingChanges::from_payload(payload(json!({
            "booking_date": "2025-04-01T22:00:00"
        })))
        .unwrap();
        let updated = changes.apply(booking.clone());

        assert_eq!(updated.booking_date, at(22, 0));
        assert_eq!(updated.name, booking.name);
        assert_eq!(updated.number_of_guests, 5);
    }

    #[test]
    fn test_serialize_round_trip() {
        let booking = Booking {
            id: 1,
            name: "John Doe".to_string(),
            number_of_guests: 4,
            booking_date: at(18, 30),
        };

        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["booking_date"], json!("2025-04-01T18:30:00"));

        let back: Booking = serde_json::from_value(value).unwrap();
        assert_eq!(back, booking);
        assert_eq!(back.to_string(), "John Doe");
    }
}
