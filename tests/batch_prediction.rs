use passenger_ai::model::ArtifactModel;
use passenger_ai::satisfaction::import::{ImportError, SurveyImporter};
use passenger_ai::satisfaction::template;
use passenger_ai::satisfaction::{PredictionAdapter, SatisfactionLabel, ValidationError};
use std::sync::Arc;

const FROZEN_ARTIFACT: &str = include_str!("../model/airline_satisfaction_v1.json");

fn frozen_adapter() -> PredictionAdapter {
    let model = ArtifactModel::from_json_str(FROZEN_ARTIFACT).expect("frozen artifact loads");
    PredictionAdapter::new(Arc::new(model))
}

#[test]
fn template_batch_yields_known_labels_and_summary() {
    let csv = template::template_csv().expect("template renders");
    let rows = SurveyImporter::from_reader(csv.as_bytes()).expect("template imports");
    let outcome = frozen_adapter().predict_batch(&rows).expect("batch completes");

    // Labels recorded from the frozen artifact snapshot.
    let labels: Vec<SatisfactionLabel> = outcome
        .results
        .iter()
        .map(|entry| entry.result.label)
        .collect();
    assert_eq!(
        labels,
        vec![
            SatisfactionLabel::Satisfied,
            SatisfactionLabel::Satisfied,
            SatisfactionLabel::Satisfied,
            SatisfactionLabel::Dissatisfied,
            SatisfactionLabel::Dissatisfied,
        ]
    );

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.summary.total, 5);
    assert_eq!(outcome.summary.satisfied, 3);
    let pct = outcome
        .summary
        .satisfied_percentage
        .expect("percentage present");
    assert!((pct - 60.0).abs() < 1e-9);
}

#[test]
fn batch_keeps_row_alignment_around_failures() {
    let csv = template::template_csv().expect("template renders");
    let mut rows = SurveyImporter::from_reader(csv.as_bytes()).expect("template imports");
    // Corrupt the middle row only.
    rows[2].age = Some("150".to_string());

    let outcome = frozen_adapter().predict_batch(&rows).expect("batch completes");

    let positions: Vec<usize> = outcome.results.iter().map(|entry| entry.row).collect();
    assert_eq!(positions, vec![0, 1, 3, 4]);

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].row, 2);
    assert!(matches!(
        outcome.errors[0].reason,
        ValidationError::OutOfRange { field: "Age", .. }
    ));

    assert_eq!(outcome.summary.total, 4);
    assert_eq!(outcome.summary.satisfied, 2);
}

#[test]
fn file_missing_class_column_is_rejected_before_any_row_parses() {
    let csv = "Customer Type,Type of Travel,Age,Flight Distance,Seat comfort,Food and drink,\
Inflight wifi service,Inflight entertainment,Online support,Ease of Online booking,\
On-board service,Leg room service,Baggage handling,Checkin service,Cleanliness,\
Online boarding,Departure Delay in Minutes,Arrival Delay in Minutes\n\
Loyal Customer,Business travel,30,500,3,3,3,3,3,3,3,3,3,3,3,3,0,0\n";

    let err = SurveyImporter::from_reader(csv.as_bytes()).expect_err("schema rejected");
    match err {
        ImportError::MissingColumns { columns } => {
            assert_eq!(columns, vec!["Class".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}
