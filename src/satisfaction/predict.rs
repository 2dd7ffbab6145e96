use super::domain::{CustomerRecord, PredictionResult, SatisfactionLabel};
use crate::model::{ModelError, ModelService};
use std::fmt;
use std::sync::Arc;

/// Polarity of the frozen classifier: class 0 means Satisfied, class 1
/// means Dissatisfied. This mapping was fixed at training time and is
/// asserted against known-label fixtures in the regression tests; it must
/// never be re-derived per call.
pub const SATISFIED_CLASS: usize = 0;

#[derive(Debug)]
pub enum PredictError {
    /// The model artifact could not be loaded; fatal, never silently
    /// replaced by a default prediction.
    ModelUnavailable(ModelError),
    /// The encoded vector disagrees with the classifier's expectations —
    /// schema drift between the record shape and the artifact.
    FeatureMismatch { detail: String },
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::ModelUnavailable(err) => write!(f, "model unavailable: {err}"),
            PredictError::FeatureMismatch { detail } => {
                write!(f, "feature mismatch: {detail}")
            }
        }
    }
}

impl std::error::Error for PredictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PredictError::ModelUnavailable(err) => Some(err),
            PredictError::FeatureMismatch { .. } => None,
        }
    }
}

impl PredictError {
    fn from_model(err: ModelError) -> Self {
        match err {
            ModelError::Unavailable { .. } | ModelError::Malformed { .. } => {
                Self::ModelUnavailable(err)
            }
            ModelError::ArityMismatch { expected, actual } => Self::FeatureMismatch {
                detail: format!("expected {expected} features, built {actual}"),
            },
            ModelError::Inconsistent { detail } => Self::FeatureMismatch { detail },
        }
    }
}

/// Wraps the model collaborator with the record-to-verdict contract:
/// encode, check arity, classify, map polarity. Holds a shared read-only
/// handle to the loaded model so repeated calls never reload the artifact.
#[derive(Clone)]
pub struct PredictionAdapter {
    model: Arc<dyn ModelService>,
}

impl PredictionAdapter {
    pub fn new(model: Arc<dyn ModelService>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn ModelService {
        self.model.as_ref()
    }

    /// Deterministic for a frozen artifact: identical records always yield
    /// identical results.
    pub fn predict(&self, record: &CustomerRecord) -> Result<PredictionResult, PredictError> {
        let vector = self
            .model
            .transform(record)
            .map_err(PredictError::from_model)?;

        let expected = self.model.input_arity();
        if vector.len() != expected {
            return Err(PredictError::FeatureMismatch {
                detail: format!("expected {expected} features, built {}", vector.len()),
            });
        }

        let class = self
            .model
            .classify(&vector)
            .map_err(PredictError::from_model)?;

        let label = if class == SATISFIED_CLASS {
            SatisfactionLabel::Satisfied
        } else {
            SatisfactionLabel::Dissatisfied
        };

        Ok(PredictionResult {
            label,
            record: record.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArtifactModel;
    use crate::satisfaction::validation::{sample_raw_record, validate, RawRecord};

    fn frozen_adapter() -> PredictionAdapter {
        let model = ArtifactModel::from_json_str(include_str!(
            "../../model/airline_satisfaction_v1.json"
        ))
        .expect("frozen artifact loads");
        PredictionAdapter::new(Arc::new(model))
    }

    fn dissatisfied_raw() -> RawRecord {
        // Template row 4: a known-dissatisfied snapshot of the frozen model.
        RawRecord {
            customer_type: Some("disloyal Customer".to_string()),
            travel_class: Some("Eco".to_string()),
            travel_type: Some("Personal Travel".to_string()),
            age: Some("25".to_string()),
            flight_distance: Some("1000".to_string()),
            seat_comfort: Some("2".to_string()),
            food_and_drink: Some("3".to_string()),
            inflight_wifi: Some("1".to_string()),
            inflight_entertainment: Some("3".to_string()),
            online_support: Some("2".to_string()),
            online_booking: Some("3".to_string()),
            onboard_service: Some("3".to_string()),
            leg_room: Some("2".to_string()),
            baggage_handling: Some("3".to_string()),
            checkin_service: Some("1".to_string()),
            cleanliness: Some("3".to_string()),
            online_boarding: Some("3".to_string()),
            departure_delay_minutes: Some("5".to_string()),
            arrival_delay_minutes: Some("10".to_string()),
        }
    }

    #[test]
    fn known_label_scenario_is_satisfied() {
        // Loyal business traveler, every rating 5 except wifi at 2, long
        // delays. Label recorded from the frozen artifact snapshot.
        let adapter = frozen_adapter();
        let record = validate(&sample_raw_record()).expect("record validates");

        let result = adapter.predict(&record).expect("prediction succeeds");
        assert_eq!(result.label, SatisfactionLabel::Satisfied);
        assert_eq!(result.record, record);
    }

    #[test]
    fn polarity_constant_matches_known_dissatisfied_sample() {
        let adapter = frozen_adapter();
        let record = validate(&dissatisfied_raw()).expect("record validates");

        let result = adapter.predict(&record).expect("prediction succeeds");
        assert_eq!(result.label, SatisfactionLabel::Dissatisfied);
    }

    #[test]
    fn prediction_is_deterministic() {
        let adapter = frozen_adapter();
        let record = validate(&sample_raw_record()).expect("record validates");

        let first = adapter.predict(&record).expect("first prediction");
        let second = adapter.predict(&record).expect("second prediction");
        assert_eq!(first, second);
    }

    #[test]
    fn vocabulary_drift_surfaces_as_feature_mismatch() {
        let mut value: serde_json::Value = serde_json::from_str(include_str!(
            "../../model/airline_satisfaction_v1.json"
        ))
        .expect("artifact parses");
        // Drop "Business" from the Class vocabulary but keep the weight
        // count aligned so the artifact still loads.
        value["categorical"][1]["categories"] =
            serde_json::json!(["Business class", "Eco", "Eco Plus"]);
        let model =
            ArtifactModel::from_json_str(&value.to_string()).expect("drifted artifact loads");
        let adapter = PredictionAdapter::new(Arc::new(model));

        let record = validate(&sample_raw_record()).expect("record validates");
        let err = adapter.predict(&record).expect_err("drift rejected");
        assert!(matches!(err, PredictError::FeatureMismatch { .. }));
    }
}
