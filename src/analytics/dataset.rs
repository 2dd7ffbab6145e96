use crate::satisfaction::domain::{CustomerRecord, SatisfactionLabel};
use crate::satisfaction::import::{check_header_set, ImportError, EXPECTED_COLUMNS};
use crate::satisfaction::validation::{validate, RawRecord, ValidationError};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Outcome column appended to the survey schema in the historical dataset.
pub const OUTCOME_COLUMN: &str = "satisfaction";

/// One historical survey response together with its recorded outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyRow {
    pub record: CustomerRecord,
    pub outcome: SatisfactionLabel,
}

/// The read-only historical dataset backing the analytics views. Loaded
/// once; rows are validated strictly, with the offending row number in any
/// error, since historical data is expected to be clean.
#[derive(Debug)]
pub struct SurveyDataset {
    rows: Vec<SurveyRow>,
}

#[derive(Debug)]
pub enum DatasetError {
    Import(ImportError),
    Row {
        row: usize,
        reason: ValidationError,
    },
    UnknownOutcome {
        row: usize,
        value: String,
    },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Import(err) => write!(f, "failed to load survey dataset: {err}"),
            DatasetError::Row { row, reason } => {
                write!(f, "survey dataset row {row}: {reason}")
            }
            DatasetError::UnknownOutcome { row, value } => {
                write!(
                    f,
                    "survey dataset row {row}: '{value}' is not a known satisfaction outcome"
                )
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Import(err) => Some(err),
            DatasetError::Row { reason, .. } => Some(reason),
            DatasetError::UnknownOutcome { .. } => None,
        }
    }
}

impl From<ImportError> for DatasetError {
    fn from(err: ImportError) -> Self {
        Self::Import(err)
    }
}

#[derive(Debug, serde::Deserialize)]
struct DatasetRow {
    #[serde(flatten)]
    record: RawRecord,
    #[serde(rename = "satisfaction")]
    outcome: String,
}

impl SurveyDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(ImportError::Io)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut expected: Vec<&str> = EXPECTED_COLUMNS.to_vec();
        expected.push(OUTCOME_COLUMN);
        let headers = csv_reader.headers().map_err(ImportError::Csv)?.clone();
        check_header_set(&headers, &expected)?;

        let mut rows = Vec::new();
        for (row, entry) in csv_reader.deserialize::<DatasetRow>().enumerate() {
            let parsed = entry.map_err(ImportError::Csv)?;
            let record =
                validate(&parsed.record).map_err(|reason| DatasetError::Row { row, reason })?;
            let outcome = SatisfactionLabel::from_outcome(&parsed.outcome).ok_or_else(|| {
                DatasetError::UnknownOutcome {
                    row,
                    value: parsed.outcome.clone(),
                }
            })?;
            rows.push(SurveyRow { record, outcome });
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[SurveyRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Nineteen survey columns plus the outcome column.
    pub const fn column_count(&self) -> usize {
        EXPECTED_COLUMNS.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset_csv(rows: &[&str]) -> String {
        let mut csv = EXPECTED_COLUMNS.join(",");
        csv.push(',');
        csv.push_str(OUTCOME_COLUMN);
        csv.push('\n');
        for row in rows {
            csv.push_str(row);
            csv.push('\n');
        }
        csv
    }

    #[test]
    fn loads_rows_with_outcomes() {
        let csv = dataset_csv(&[
            "Loyal Customer,Business,Business travel,60,200,5,5,2,5,5,5,5,5,5,5,5,5,100,200,satisfied",
            "disloyal Customer,Eco,Personal Travel,25,1000,2,3,1,3,2,3,3,2,3,1,3,3,5,10,dissatisfied",
        ]);

        let dataset = SurveyDataset::from_reader(csv.as_bytes()).expect("dataset loads");
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_count(), 20);
        assert_eq!(dataset.rows()[0].outcome, SatisfactionLabel::Satisfied);
        assert_eq!(dataset.rows()[1].outcome, SatisfactionLabel::Dissatisfied);
    }

    #[test]
    fn missing_outcome_column_is_rejected() {
        let mut csv = EXPECTED_COLUMNS.join(",");
        csv.push('\n');
        let err = SurveyDataset::from_reader(csv.as_bytes()).expect_err("header rejected");
        match err {
            DatasetError::Import(ImportError::MissingColumns { columns }) => {
                assert_eq!(columns, vec![OUTCOME_COLUMN.to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_row_reports_its_position() {
        let csv = dataset_csv(&[
            "Loyal Customer,Business,Business travel,60,200,5,5,2,5,5,5,5,5,5,5,5,5,100,200,satisfied",
            "Loyal Customer,Business,Business travel,0,200,5,5,2,5,5,5,5,5,5,5,5,5,100,200,satisfied",
        ]);

        let err = SurveyDataset::from_reader(csv.as_bytes()).expect_err("bad age rejected");
        assert!(matches!(err, DatasetError::Row { row: 1, .. }));
    }

    #[test]
    fn unknown_outcome_is_rejected() {
        let csv = dataset_csv(&[
            "Loyal Customer,Business,Business travel,60,200,5,5,2,5,5,5,5,5,5,5,5,5,100,200,neutral",
        ]);

        let err = SurveyDataset::from_reader(csv.as_bytes()).expect_err("outcome rejected");
        match err {
            DatasetError::UnknownOutcome { row, value } => {
                assert_eq!(row, 0);
                assert_eq!(value, "neutral");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
