pub mod artifact;

use crate::satisfaction::domain::CustomerRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub use artifact::ArtifactModel;

/// The frozen classification pipeline, treated as an opaque, versioned
/// collaborator: a preprocessing stage that encodes a record into the
/// numeric vector the classifier was trained on, and the classifier itself
/// returning a binary class index. Implementations must be safe to share
/// read-only across calls.
pub trait ModelService: Send + Sync {
    /// Encodes a validated record into the model's feature vector: one-hot
    /// over the categorical columns followed by the numeric columns, both
    /// in the order the artifact was trained with.
    fn transform(&self, record: &CustomerRecord) -> Result<Vec<f32>, ModelError>;

    /// Runs the classifier over an encoded vector and returns the class
    /// index. The vector's length must equal `input_arity`.
    fn classify(&self, vector: &[f32]) -> Result<usize, ModelError>;

    /// One non-negative weight per encoded feature, in training order.
    fn feature_importances(&self) -> Vec<FeatureImportance>;

    /// Number of encoded features the classifier expects.
    fn input_arity(&self) -> usize;

    fn metadata(&self) -> ModelMetadata;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetadata {
    pub name: String,
    pub version: String,
    pub trained_at: NaiveDate,
    pub input_arity: usize,
}

#[derive(Debug)]
pub enum ModelError {
    /// The artifact file could not be read at all.
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The artifact file exists but does not parse as a model.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The artifact parsed but its pieces disagree with each other or with
    /// the record schema. Schema drift must fail loudly, never degrade.
    Inconsistent { detail: String },
    /// An encoded vector of the wrong length reached the classifier.
    ArityMismatch { expected: usize, actual: usize },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Unavailable { path, source } => {
                write!(
                    f,
                    "model artifact '{}' could not be loaded: {source}",
                    path.display()
                )
            }
            ModelError::Malformed { path, source } => {
                write!(
                    f,
                    "model artifact '{}' is not a valid model: {source}",
                    path.display()
                )
            }
            ModelError::Inconsistent { detail } => {
                write!(f, "model artifact is internally inconsistent: {detail}")
            }
            ModelError::ArityMismatch { expected, actual } => {
                write!(
                    f,
                    "classifier expects {expected} features, received {actual}"
                )
            }
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Unavailable { source, .. } => Some(source),
            ModelError::Malformed { source, .. } => Some(source),
            ModelError::Inconsistent { .. } | ModelError::ArityMismatch { .. } => None,
        }
    }
}

/// Importances sorted by descending weight, ties broken by feature name so
/// the ranking is stable across calls.
pub fn ranked_importances(model: &dyn ModelService) -> Vec<FeatureImportance> {
    let mut ranked = model.feature_importances();
    ranked.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.feature.cmp(&b.feature))
    });
    ranked
}
