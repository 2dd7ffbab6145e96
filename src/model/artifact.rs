use super::{FeatureImportance, ModelError, ModelMetadata, ModelService};
use crate::satisfaction::domain::CustomerRecord;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

/// JSON-serialized snapshot of the trained pipeline: the one-hot
/// vocabularies of the preprocessing stage, the numeric column order, a
/// linear decision head, and per-feature importances. The scoring rule is
/// owned by the artifact; this type only hosts it.
#[derive(Debug, Deserialize)]
struct ArtifactFile {
    name: String,
    version: String,
    trained_at: NaiveDate,
    categorical: Vec<CategoricalBlock>,
    numeric: Vec<String>,
    weights: Vec<f32>,
    bias: f32,
    importances: Vec<ImportanceEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoricalBlock {
    column: String,
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ImportanceEntry {
    feature: String,
    importance: f32,
}

#[derive(Debug)]
pub struct ArtifactModel {
    file: ArtifactFile,
    arity: usize,
}

impl ArtifactModel {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw, path.to_path_buf())
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ModelError> {
        let mut raw = String::new();
        reader
            .read_to_string(&mut raw)
            .map_err(|source| ModelError::Unavailable {
                path: PathBuf::from("<reader>"),
                source,
            })?;
        Self::from_json(&raw, PathBuf::from("<reader>"))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ModelError> {
        Self::from_json(raw, PathBuf::from("<inline>"))
    }

    fn from_json(raw: &str, path: PathBuf) -> Result<Self, ModelError> {
        let file: ArtifactFile =
            serde_json::from_str(raw).map_err(|source| ModelError::Malformed { path, source })?;
        Self::verify(file)
    }

    /// Shape checks happen once at load; afterwards every prediction can
    /// trust the artifact's internal agreement.
    fn verify(file: ArtifactFile) -> Result<Self, ModelError> {
        let one_hot_width: usize = file
            .categorical
            .iter()
            .map(|block| block.categories.len())
            .sum();
        let arity = one_hot_width + file.numeric.len();

        if file.weights.len() != arity {
            return Err(ModelError::Inconsistent {
                detail: format!(
                    "{} weights for {} encoded features",
                    file.weights.len(),
                    arity
                ),
            });
        }

        if file.importances.len() != arity {
            return Err(ModelError::Inconsistent {
                detail: format!(
                    "{} importance entries for {} encoded features",
                    file.importances.len(),
                    arity
                ),
            });
        }

        if let Some(entry) = file.importances.iter().find(|entry| entry.importance < 0.0) {
            return Err(ModelError::Inconsistent {
                detail: format!("negative importance for '{}'", entry.feature),
            });
        }

        for block in &file.categorical {
            if block.categories.is_empty() {
                return Err(ModelError::Inconsistent {
                    detail: format!("categorical column '{}' has no categories", block.column),
                });
            }
        }

        Ok(Self { file, arity })
    }

    fn categorical_value(record: &CustomerRecord, column: &str) -> Option<&'static str> {
        match column {
            "Customer Type" => Some(record.customer_type.label()),
            "Class" => Some(record.travel_class.label()),
            "Type of Travel" => Some(record.travel_type.label()),
            _ => None,
        }
    }

    fn numeric_value(record: &CustomerRecord, column: &str) -> Option<f32> {
        let value = match column {
            "Age" => record.age as f32,
            "Flight Distance" => record.flight_distance as f32,
            "Seat comfort" => record.seat_comfort as f32,
            "Food and drink" => record.food_and_drink as f32,
            "Inflight wifi service" => record.inflight_wifi as f32,
            "Inflight entertainment" => record.inflight_entertainment as f32,
            "Online support" => record.online_support as f32,
            "Ease of Online booking" => record.online_booking as f32,
            "On-board service" => record.onboard_service as f32,
            "Leg room service" => record.leg_room as f32,
            "Baggage handling" => record.baggage_handling as f32,
            "Checkin service" => record.checkin_service as f32,
            "Cleanliness" => record.cleanliness as f32,
            "Online boarding" => record.online_boarding as f32,
            "Departure Delay in Minutes" => record.departure_delay_minutes as f32,
            "Arrival Delay in Minutes" => record.arrival_delay_minutes as f32,
            _ => return None,
        };
        Some(value)
    }
}

impl ModelService for ArtifactModel {
    fn transform(&self, record: &CustomerRecord) -> Result<Vec<f32>, ModelError> {
        let mut vector = Vec::with_capacity(self.arity);

        for block in &self.file.categorical {
            let value = Self::categorical_value(record, &block.column).ok_or_else(|| {
                ModelError::Inconsistent {
                    detail: format!(
                        "artifact encodes unknown categorical column '{}'",
                        block.column
                    ),
                }
            })?;

            if !block.categories.iter().any(|category| category == value) {
                return Err(ModelError::Inconsistent {
                    detail: format!(
                        "'{value}' is outside the trained vocabulary of '{}'",
                        block.column
                    ),
                });
            }

            for category in &block.categories {
                vector.push(if category == value { 1.0 } else { 0.0 });
            }
        }

        for column in &self.file.numeric {
            let value =
                Self::numeric_value(record, column).ok_or_else(|| ModelError::Inconsistent {
                    detail: format!("artifact references unknown numeric column '{column}'"),
                })?;
            vector.push(value);
        }

        Ok(vector)
    }

    fn classify(&self, vector: &[f32]) -> Result<usize, ModelError> {
        if vector.len() != self.arity {
            return Err(ModelError::ArityMismatch {
                expected: self.arity,
                actual: vector.len(),
            });
        }

        let score: f32 = self
            .file
            .weights
            .iter()
            .zip(vector)
            .map(|(weight, value)| weight * value)
            .sum::<f32>()
            + self.file.bias;

        Ok(usize::from(score > 0.0))
    }

    fn feature_importances(&self) -> Vec<FeatureImportance> {
        self.file
            .importances
            .iter()
            .map(|entry| FeatureImportance {
                feature: entry.feature.clone(),
                importance: entry.importance,
            })
            .collect()
    }

    fn input_arity(&self) -> usize {
        self.arity
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            name: self.file.name.clone(),
            version: self.file.version.clone(),
            trained_at: self.file.trained_at,
            input_arity: self.arity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::satisfaction::validation::{sample_raw_record, validate};

    const FROZEN_ARTIFACT: &str = include_str!("../../model/airline_satisfaction_v1.json");

    #[test]
    fn frozen_artifact_loads_with_expected_shape() {
        let model = ArtifactModel::from_json_str(FROZEN_ARTIFACT).expect("artifact loads");
        assert_eq!(model.input_arity(), 23);

        let metadata = model.metadata();
        assert_eq!(metadata.name, "airline-satisfaction");
        assert_eq!(metadata.version, "1.0.0");
        assert_eq!(metadata.input_arity, 23);
    }

    #[test]
    fn transform_places_one_hot_before_numeric_columns() {
        let model = ArtifactModel::from_json_str(FROZEN_ARTIFACT).expect("artifact loads");
        let record = validate(&sample_raw_record()).expect("record validates");

        let vector = model.transform(&record).expect("record encodes");
        assert_eq!(vector.len(), 23);
        // Loyal Customer, Business class, Business travel.
        assert_eq!(&vector[..7], &[1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(vector[7], 60.0);
        assert_eq!(vector[8], 200.0);
        assert_eq!(vector[11], 2.0);
        assert_eq!(vector[21], 100.0);
        assert_eq!(vector[22], 200.0);
    }

    #[test]
    fn classify_rejects_wrong_arity() {
        let model = ArtifactModel::from_json_str(FROZEN_ARTIFACT).expect("artifact loads");
        let err = model.classify(&[1.0, 2.0, 3.0]).expect_err("short vector");
        assert!(matches!(
            err,
            ModelError::ArityMismatch {
                expected: 23,
                actual: 3
            }
        ));
    }

    #[test]
    fn weight_count_disagreement_fails_at_load() {
        let mut value: serde_json::Value =
            serde_json::from_str(FROZEN_ARTIFACT).expect("artifact parses");
        value["weights"]
            .as_array_mut()
            .expect("weights array")
            .pop();
        let raw = value.to_string();

        let err = ArtifactModel::from_json_str(&raw).expect_err("truncated weights rejected");
        assert!(matches!(err, ModelError::Inconsistent { .. }));
    }

    #[test]
    fn missing_file_reports_unavailable() {
        let err = ArtifactModel::from_path("model/no_such_artifact.json")
            .expect_err("missing artifact rejected");
        assert!(matches!(err, ModelError::Unavailable { .. }));
    }

    #[test]
    fn importances_are_non_negative_and_complete() {
        let model = ArtifactModel::from_json_str(FROZEN_ARTIFACT).expect("artifact loads");
        let importances = model.feature_importances();
        assert_eq!(importances.len(), 23);
        assert!(importances.iter().all(|entry| entry.importance >= 0.0));
    }
}
