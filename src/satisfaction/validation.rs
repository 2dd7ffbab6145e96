use super::domain::{CustomerRecord, CustomerType, TravelClass, TravelType};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// One unvalidated survey response, as it arrives from the CSV boundary or
/// the JSON API: every cell is an optional string keyed by the template's
/// column names. Empty cells are `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Customer Type", default, deserialize_with = "scalar_as_string")]
    pub customer_type: Option<String>,
    #[serde(rename = "Class", default, deserialize_with = "scalar_as_string")]
    pub travel_class: Option<String>,
    #[serde(rename = "Type of Travel", default, deserialize_with = "scalar_as_string")]
    pub travel_type: Option<String>,
    #[serde(rename = "Age", default, deserialize_with = "scalar_as_string")]
    pub age: Option<String>,
    #[serde(rename = "Flight Distance", default, deserialize_with = "scalar_as_string")]
    pub flight_distance: Option<String>,
    #[serde(rename = "Seat comfort", default, deserialize_with = "scalar_as_string")]
    pub seat_comfort: Option<String>,
    #[serde(rename = "Food and drink", default, deserialize_with = "scalar_as_string")]
    pub food_and_drink: Option<String>,
    #[serde(
        rename = "Inflight wifi service",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub inflight_wifi: Option<String>,
    #[serde(
        rename = "Inflight entertainment",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub inflight_entertainment: Option<String>,
    #[serde(rename = "Online support", default, deserialize_with = "scalar_as_string")]
    pub online_support: Option<String>,
    #[serde(
        rename = "Ease of Online booking",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub online_booking: Option<String>,
    #[serde(rename = "On-board service", default, deserialize_with = "scalar_as_string")]
    pub onboard_service: Option<String>,
    #[serde(rename = "Leg room service", default, deserialize_with = "scalar_as_string")]
    pub leg_room: Option<String>,
    #[serde(rename = "Baggage handling", default, deserialize_with = "scalar_as_string")]
    pub baggage_handling: Option<String>,
    #[serde(rename = "Checkin service", default, deserialize_with = "scalar_as_string")]
    pub checkin_service: Option<String>,
    #[serde(rename = "Cleanliness", default, deserialize_with = "scalar_as_string")]
    pub cleanliness: Option<String>,
    #[serde(rename = "Online boarding", default, deserialize_with = "scalar_as_string")]
    pub online_boarding: Option<String>,
    #[serde(
        rename = "Departure Delay in Minutes",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub departure_delay_minutes: Option<String>,
    #[serde(
        rename = "Arrival Delay in Minutes",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub arrival_delay_minutes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField {
        field: &'static str,
    },
    UnknownChoice {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    NotAnInteger {
        field: &'static str,
        value: String,
    },
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: Option<i64>,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField { field } => {
                write!(f, "missing value for '{field}'")
            }
            ValidationError::UnknownChoice {
                field,
                value,
                allowed,
            } => {
                write!(
                    f,
                    "'{value}' is not a valid '{field}' (expected one of: {})",
                    allowed.join(", ")
                )
            }
            ValidationError::NotAnInteger { field, value } => {
                write!(f, "'{value}' is not a whole number for '{field}'")
            }
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => match max {
                Some(max) => write!(
                    f,
                    "'{field}' must be between {min} and {max}, got {value}"
                ),
                None => write!(f, "'{field}' must be at least {min}, got {value}"),
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks every field of a raw record against its declared domain and
/// produces a typed record. Pure; fields are checked in template column
/// order, so the first offending column is reported.
pub fn validate(raw: &RawRecord) -> Result<CustomerRecord, ValidationError> {
    let customer_type = parse_choice(
        "Customer Type",
        &raw.customer_type,
        CustomerType::from_label,
        CustomerType::options(),
    )?;
    let travel_class = parse_choice(
        "Class",
        &raw.travel_class,
        TravelClass::from_label,
        TravelClass::options(),
    )?;
    let travel_type = parse_choice(
        "Type of Travel",
        &raw.travel_type,
        TravelType::from_label,
        TravelType::options(),
    )?;

    let age = parse_int("Age", &raw.age, 1, Some(100))?;
    let flight_distance = parse_int("Flight Distance", &raw.flight_distance, 1, Some(10_000))?;

    let seat_comfort = parse_rating("Seat comfort", &raw.seat_comfort)?;
    let food_and_drink = parse_rating("Food and drink", &raw.food_and_drink)?;
    let inflight_wifi = parse_rating("Inflight wifi service", &raw.inflight_wifi)?;
    let inflight_entertainment =
        parse_rating("Inflight entertainment", &raw.inflight_entertainment)?;
    let online_support = parse_rating("Online support", &raw.online_support)?;
    let online_booking = parse_rating("Ease of Online booking", &raw.online_booking)?;
    let onboard_service = parse_rating("On-board service", &raw.onboard_service)?;
    let leg_room = parse_rating("Leg room service", &raw.leg_room)?;
    let baggage_handling = parse_rating("Baggage handling", &raw.baggage_handling)?;
    let checkin_service = parse_rating("Checkin service", &raw.checkin_service)?;
    let cleanliness = parse_rating("Cleanliness", &raw.cleanliness)?;
    let online_boarding = parse_rating("Online boarding", &raw.online_boarding)?;

    let departure_delay_minutes = parse_int(
        "Departure Delay in Minutes",
        &raw.departure_delay_minutes,
        0,
        None,
    )?;
    let arrival_delay_minutes = parse_int(
        "Arrival Delay in Minutes",
        &raw.arrival_delay_minutes,
        0,
        None,
    )?;

    Ok(CustomerRecord {
        customer_type,
        travel_class,
        travel_type,
        age: age as u8,
        flight_distance: flight_distance as u16,
        seat_comfort,
        food_and_drink,
        inflight_wifi,
        inflight_entertainment,
        online_support,
        online_booking,
        onboard_service,
        leg_room,
        baggage_handling,
        checkin_service,
        cleanliness,
        online_boarding,
        departure_delay_minutes: departure_delay_minutes as u64,
        arrival_delay_minutes: arrival_delay_minutes as u64,
    })
}

fn require<'a>(
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed),
        _ => Err(ValidationError::MissingField { field }),
    }
}

fn parse_choice<T>(
    field: &'static str,
    value: &Option<String>,
    from_label: fn(&str) -> Option<T>,
    allowed: &'static [&'static str],
) -> Result<T, ValidationError> {
    let raw = require(field, value)?;
    from_label(raw).ok_or_else(|| ValidationError::UnknownChoice {
        field,
        value: raw.to_string(),
        allowed,
    })
}

fn parse_int(
    field: &'static str,
    value: &Option<String>,
    min: i64,
    max: Option<i64>,
) -> Result<i64, ValidationError> {
    let raw = require(field, value)?;
    let parsed = raw
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger {
            field,
            value: raw.to_string(),
        })?;

    let above_max = max.is_some_and(|max| parsed > max);
    if parsed < min || above_max {
        return Err(ValidationError::OutOfRange {
            field,
            value: parsed,
            min,
            max,
        });
    }

    Ok(parsed)
}

fn parse_rating(field: &'static str, value: &Option<String>) -> Result<u8, ValidationError> {
    parse_int(field, value, 0, Some(5)).map(|rating| rating as u8)
}

/// Accepts JSON numbers as well as strings, since API clients tend to send
/// ratings and delays as numbers while CSV cells are always text.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    let opt = Option::<Scalar>::deserialize(deserializer)?;
    Ok(opt.and_then(|scalar| match scalar {
        Scalar::Integer(value) => Some(value.to_string()),
        Scalar::Float(value) if value.fract() == 0.0 => Some((value as i64).to_string()),
        Scalar::Float(value) => Some(value.to_string()),
        Scalar::Text(value) => {
            let trimmed = value.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        }
    }))
}

/// Fully populated raw record used as a baseline across test modules; the
/// §8 known-label scenario (loyal business traveler, wifi rated 2).
#[cfg(test)]
pub(crate) fn sample_raw_record() -> RawRecord {
    RawRecord {
        customer_type: Some("Loyal Customer".to_string()),
        travel_class: Some("Business".to_string()),
        travel_type: Some("Business travel".to_string()),
        age: Some("60".to_string()),
        flight_distance: Some("200".to_string()),
        seat_comfort: Some("5".to_string()),
        food_and_drink: Some("5".to_string()),
        inflight_wifi: Some("2".to_string()),
        inflight_entertainment: Some("5".to_string()),
        online_support: Some("5".to_string()),
        online_booking: Some("5".to_string()),
        onboard_service: Some("5".to_string()),
        leg_room: Some("5".to_string()),
        baggage_handling: Some("5".to_string()),
        checkin_service: Some("5".to_string()),
        cleanliness: Some("5".to_string()),
        online_boarding: Some("5".to_string()),
        departure_delay_minutes: Some("100".to_string()),
        arrival_delay_minutes: Some("200".to_string()),
    }
}
