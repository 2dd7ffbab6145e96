use super::domain::{BatchSummary, PredictionResult, SatisfactionLabel};
use super::predict::{PredictError, PredictionAdapter};
use super::validation::{validate, RawRecord, ValidationError};
use serde::Serialize;

/// A row that failed validation; the batch carries on without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// Zero-based position in the imported row sequence (header excluded).
    pub row: usize,
    pub reason: ValidationError,
}

/// A successfully predicted row, tagged with its input position so results
/// stay aligned with the uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub row: usize,
    pub result: PredictionResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub results: Vec<BatchRow>,
    pub errors: Vec<RowError>,
    pub summary: BatchSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowErrorView {
    pub row: usize,
    pub reason: String,
}

impl RowError {
    pub fn to_view(&self) -> RowErrorView {
        RowErrorView {
            row: self.row,
            reason: self.reason.to_string(),
        }
    }
}

impl PredictionAdapter {
    /// Validates and predicts every row independently, in input order.
    /// Validation failures are collected per row; model-level faults
    /// (`ModelUnavailable`, `FeatureMismatch`) indicate drift affecting
    /// the whole file and abort the batch instead of producing misaligned
    /// partial output.
    pub fn predict_batch(&self, rows: &[RawRecord]) -> Result<BatchOutcome, PredictError> {
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for (row, raw) in rows.iter().enumerate() {
            match validate(raw) {
                Ok(record) => {
                    let result = self.predict(&record)?;
                    results.push(BatchRow { row, result });
                }
                Err(reason) => errors.push(RowError { row, reason }),
            }
        }

        let satisfied = results
            .iter()
            .filter(|entry| entry.result.label == SatisfactionLabel::Satisfied)
            .count();
        let summary = BatchSummary::from_counts(results.len(), satisfied);

        Ok(BatchOutcome {
            results,
            errors,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArtifactModel;
    use crate::satisfaction::validation::sample_raw_record;
    use std::sync::Arc;

    fn frozen_adapter() -> PredictionAdapter {
        let model = ArtifactModel::from_json_str(include_str!(
            "../../model/airline_satisfaction_v1.json"
        ))
        .expect("frozen artifact loads");
        PredictionAdapter::new(Arc::new(model))
    }

    #[test]
    fn invalid_rows_are_collected_without_aborting() {
        let mut broken = sample_raw_record();
        broken.age = Some("150".to_string());

        let rows = vec![sample_raw_record(), broken, sample_raw_record()];
        let outcome = frozen_adapter()
            .predict_batch(&rows)
            .expect("batch completes");

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].row, 0);
        assert_eq!(outcome.results[1].row, 2);

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, 1);
        assert!(matches!(
            outcome.errors[0].reason,
            ValidationError::OutOfRange { field: "Age", .. }
        ));

        assert_eq!(outcome.summary.total, 2);
    }

    #[test]
    fn results_preserve_input_order() {
        let rows = vec![
            sample_raw_record(),
            sample_raw_record(),
            sample_raw_record(),
        ];
        let outcome = frozen_adapter()
            .predict_batch(&rows)
            .expect("batch completes");

        let positions: Vec<usize> = outcome.results.iter().map(|entry| entry.row).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn all_invalid_rows_yield_summary_without_percentage() {
        let mut broken = sample_raw_record();
        broken.customer_type = None;

        let outcome = frozen_adapter()
            .predict_batch(&[broken.clone(), broken])
            .expect("batch completes");

        assert!(outcome.results.is_empty());
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.summary.total, 0);
        assert_eq!(outcome.summary.satisfied, 0);
        assert!(outcome.summary.satisfied_percentage.is_none());
    }

    #[test]
    fn empty_batch_is_not_an_error() {
        let outcome = frozen_adapter().predict_batch(&[]).expect("empty batch");
        assert!(outcome.results.is_empty());
        assert!(outcome.errors.is_empty());
        assert!(outcome.summary.satisfied_percentage.is_none());
    }
}
