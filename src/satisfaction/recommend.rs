use super::domain::{PredictionResult, SatisfactionLabel};
use serde::Serialize;

/// The twelve rated service areas, in the order the survey presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceArea {
    SeatComfort,
    FoodAndDrink,
    InflightWifi,
    InflightEntertainment,
    OnlineSupport,
    OnlineBooking,
    OnboardService,
    LegRoom,
    BaggageHandling,
    CheckinService,
    Cleanliness,
    OnlineBoarding,
}

impl ServiceArea {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SeatComfort => "Seat comfort",
            Self::FoodAndDrink => "Food and drink",
            Self::InflightWifi => "Inflight wifi service",
            Self::InflightEntertainment => "Inflight entertainment",
            Self::OnlineSupport => "Online support",
            Self::OnlineBooking => "Ease of Online booking",
            Self::OnboardService => "On-board service",
            Self::LegRoom => "Leg room service",
            Self::BaggageHandling => "Baggage handling",
            Self::CheckinService => "Checkin service",
            Self::Cleanliness => "Cleanliness",
            Self::OnlineBoarding => "Online boarding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub area: ServiceArea,
    pub advice: &'static str,
}

impl Recommendation {
    pub fn to_view(&self) -> RecommendationView {
        RecommendationView {
            area: self.area,
            area_label: self.area.label(),
            advice: self.advice,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub area: ServiceArea,
    pub area_label: &'static str,
    pub advice: &'static str,
}

/// Fixed improvement catalog shown for dissatisfied verdicts, one entry per
/// service area, in declared order. Deliberately not filtered by the
/// record's individual ratings.
pub const CATALOG: [Recommendation; 12] = [
    Recommendation {
        area: ServiceArea::SeatComfort,
        advice: "Consider upgrading the seating comfort to improve customer satisfaction.",
    },
    Recommendation {
        area: ServiceArea::FoodAndDrink,
        advice: "Enhance the quality and variety of food and drinks offered during the flight.",
    },
    Recommendation {
        area: ServiceArea::InflightWifi,
        advice: "Improve the reliability and speed of inflight WiFi services.",
    },
    Recommendation {
        area: ServiceArea::InflightEntertainment,
        advice: "Provide a wider selection of entertainment options including movies, music, and games.",
    },
    Recommendation {
        area: ServiceArea::OnlineSupport,
        advice: "Enhance online support with quicker response times and more helpful information.",
    },
    Recommendation {
        area: ServiceArea::OnlineBooking,
        advice: "Simplify the online booking process and ensure the website is user-friendly.",
    },
    Recommendation {
        area: ServiceArea::OnboardService,
        advice: "Train staff to be more attentive and responsive to customer needs during the flight.",
    },
    Recommendation {
        area: ServiceArea::LegRoom,
        advice: "Increase the legroom available to passengers to make their flight more comfortable.",
    },
    Recommendation {
        area: ServiceArea::BaggageHandling,
        advice: "Ensure that baggage handling is efficient and that luggage is delivered promptly.",
    },
    Recommendation {
        area: ServiceArea::CheckinService,
        advice: "Streamline the check-in process and reduce waiting times.",
    },
    Recommendation {
        area: ServiceArea::Cleanliness,
        advice: "Maintain high standards of cleanliness throughout the flight.",
    },
    Recommendation {
        area: ServiceArea::OnlineBoarding,
        advice: "Improve the online boarding process for a smoother experience.",
    },
];

/// Empty for satisfied verdicts; the full catalog otherwise. Pure lookup.
pub fn recommendations_for(result: &PredictionResult) -> &'static [Recommendation] {
    match result.label {
        SatisfactionLabel::Satisfied => &[],
        SatisfactionLabel::Dissatisfied => &CATALOG,
    }
}
