use serde::{Deserialize, Serialize};

/// Loyalty segment of a passenger, spelled the way the survey dataset
/// spells it ("Loyal Customer" / "disloyal Customer").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    Loyal,
    Disloyal,
}

impl CustomerType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Loyal, Self::Disloyal]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Loyal => "Loyal Customer",
            Self::Disloyal => "disloyal Customer",
        }
    }

    pub const fn options() -> &'static [&'static str] {
        &["Loyal Customer", "disloyal Customer"]
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|choice| choice.label() == value)
    }
}

/// Booked cabin class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelClass {
    Eco,
    EcoPlus,
    Business,
}

impl TravelClass {
    pub const fn ordered() -> [Self; 3] {
        [Self::Eco, Self::EcoPlus, Self::Business]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Eco => "Eco",
            Self::EcoPlus => "Eco Plus",
            Self::Business => "Business",
        }
    }

    pub const fn options() -> &'static [&'static str] {
        &["Eco", "Eco Plus", "Business"]
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|choice| choice.label() == value)
    }
}

/// Purpose of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelType {
    Business,
    Personal,
}

impl TravelType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Business, Self::Personal]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Business => "Business travel",
            Self::Personal => "Personal Travel",
        }
    }

    pub const fn options() -> &'static [&'static str] {
        &["Business travel", "Personal Travel"]
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|choice| choice.label() == value)
    }
}

/// Binary verdict produced by the classifier, or recorded as the historical
/// outcome column of the survey dataset (lowercase there).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatisfactionLabel {
    Satisfied,
    Dissatisfied,
}

impl SatisfactionLabel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Satisfied => "Satisfied",
            Self::Dissatisfied => "Dissatisfied",
        }
    }

    /// Parses the outcome column of the historical dataset.
    pub fn from_outcome(value: &str) -> Option<Self> {
        match value.trim() {
            "satisfied" => Some(Self::Satisfied),
            "dissatisfied" => Some(Self::Dissatisfied),
            _ => None,
        }
    }
}

/// One fully validated passenger survey response. Every field is required
/// and within its domain before a record reaches the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRecord {
    pub customer_type: CustomerType,
    pub travel_class: TravelClass,
    pub travel_type: TravelType,
    pub age: u8,
    pub flight_distance: u16,
    pub seat_comfort: u8,
    pub food_and_drink: u8,
    pub inflight_wifi: u8,
    pub inflight_entertainment: u8,
    pub online_support: u8,
    pub online_booking: u8,
    pub onboard_service: u8,
    pub leg_room: u8,
    pub baggage_handling: u8,
    pub checkin_service: u8,
    pub cleanliness: u8,
    pub online_boarding: u8,
    // Wide on purpose: delays have no upper bound, so the type must hold
    // any non-negative value the parser accepts.
    pub departure_delay_minutes: u64,
    pub arrival_delay_minutes: u64,
}

/// Outcome of a single prediction call. Created per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub label: SatisfactionLabel,
    pub record: CustomerRecord,
}

/// Aggregate over the successfully predicted rows of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub satisfied: usize,
    /// Omitted entirely when no row predicted successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfied_percentage: Option<f64>,
}

impl BatchSummary {
    pub fn from_counts(total: usize, satisfied: usize) -> Self {
        let satisfied_percentage = if total == 0 {
            None
        } else {
            Some(satisfied as f64 / total as f64 * 100.0)
        };

        Self {
            total,
            satisfied,
            satisfied_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_label() {
        for choice in CustomerType::ordered() {
            assert_eq!(CustomerType::from_label(choice.label()), Some(choice));
        }
        for choice in TravelClass::ordered() {
            assert_eq!(TravelClass::from_label(choice.label()), Some(choice));
        }
        for choice in TravelType::ordered() {
            assert_eq!(TravelType::from_label(choice.label()), Some(choice));
        }
    }

    #[test]
    fn from_label_is_case_sensitive_like_the_dataset() {
        assert_eq!(CustomerType::from_label("loyal customer"), None);
        assert_eq!(CustomerType::from_label("Disloyal Customer"), None);
    }

    #[test]
    fn outcome_parses_lowercase_dataset_values() {
        assert_eq!(
            SatisfactionLabel::from_outcome(" satisfied "),
            Some(SatisfactionLabel::Satisfied)
        );
        assert_eq!(
            SatisfactionLabel::from_outcome("dissatisfied"),
            Some(SatisfactionLabel::Dissatisfied)
        );
        assert_eq!(SatisfactionLabel::from_outcome("Satisfied"), None);
    }

    #[test]
    fn empty_summary_has_no_percentage() {
        let summary = BatchSummary::from_counts(0, 0);
        assert_eq!(summary.total, 0);
        assert!(summary.satisfied_percentage.is_none());
    }

    #[test]
    fn summary_percentage_is_computed_over_successes() {
        let summary = BatchSummary::from_counts(5, 3);
        assert_eq!(summary.satisfied, 3);
        let pct = summary.satisfied_percentage.expect("percentage present");
        assert!((pct - 60.0).abs() < f64::EPSILON);
    }
}
