use super::validation::RawRecord;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// The template's column set, in declared order. Uploaded files must carry
/// exactly these nineteen columns (order is not significant).
pub const EXPECTED_COLUMNS: [&str; 19] = [
    "Customer Type",
    "Class",
    "Type of Travel",
    "Age",
    "Flight Distance",
    "Seat comfort",
    "Food and drink",
    "Inflight wifi service",
    "Inflight entertainment",
    "Online support",
    "Ease of Online booking",
    "On-board service",
    "Leg room service",
    "Baggage handling",
    "Checkin service",
    "Cleanliness",
    "Online boarding",
    "Departure Delay in Minutes",
    "Arrival Delay in Minutes",
];

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// Required columns absent from the header row, in template order.
    MissingColumns { columns: Vec<String> },
    /// Columns the template does not declare; the schema must match
    /// exactly so misaligned files are caught at the boundary.
    UnexpectedColumns { columns: Vec<String> },
    /// Columns that appear more than once in the header row. Serde would
    /// otherwise keep the last occurrence and drop the rest silently.
    DuplicateColumns { columns: Vec<String> },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read uploaded file: {err}"),
            ImportError::Csv(err) => write!(f, "invalid CSV data: {err}"),
            ImportError::MissingColumns { columns } => {
                write!(f, "missing required column(s): {}", columns.join(", "))
            }
            ImportError::UnexpectedColumns { columns } => {
                write!(f, "unexpected column(s): {}", columns.join(", "))
            }
            ImportError::DuplicateColumns { columns } => {
                write!(f, "duplicated column(s): {}", columns.join(", "))
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::MissingColumns { .. }
            | ImportError::UnexpectedColumns { .. }
            | ImportError::DuplicateColumns { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads a batch upload into raw records. The header set is checked before
/// any row is parsed, so a file missing a column is rejected by name and
/// never reaches the per-row validator with misaligned cells.
pub struct SurveyImporter;

impl SurveyImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        check_header_set(&headers, &EXPECTED_COLUMNS)?;

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<RawRecord>() {
            records.push(row?);
        }

        Ok(records)
    }
}

/// Compares the header row against an expected column set; missing columns
/// are reported in expected order, unexpected ones in file order.
pub(crate) fn check_header_set(
    headers: &csv::StringRecord,
    expected: &[&str],
) -> Result<(), ImportError> {
    let missing: Vec<String> = expected
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| (*column).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns { columns: missing });
    }

    let unexpected: Vec<String> = headers
        .iter()
        .filter(|header| !expected.contains(header))
        .map(|header| header.to_string())
        .collect();
    if !unexpected.is_empty() {
        return Err(ImportError::UnexpectedColumns { columns: unexpected });
    }

    let mut duplicates: Vec<String> = Vec::new();
    for (position, header) in headers.iter().enumerate() {
        let repeated = headers.iter().take(position).any(|earlier| earlier == header);
        if repeated && !duplicates.iter().any(|name| name == header) {
            duplicates.push(header.to_string());
        }
    }
    if !duplicates.is_empty() {
        return Err(ImportError::DuplicateColumns {
            columns: duplicates,
        });
    }

    Ok(())
}
