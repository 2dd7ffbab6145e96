use super::import::EXPECTED_COLUMNS;
use std::io::Write;

/// Five representative survey responses shipped with the template so
/// analysts can see the expected shape before uploading their own file.
/// Purely illustrative; the rows carry no behavior.
const TEMPLATE_ROWS: [[&str; 19]; 5] = [
    [
        "Loyal Customer", "Eco", "Business travel", "35", "500", "3", "4", "2", "4", "3", "4",
        "4", "3", "4", "4", "5", "4", "10", "15",
    ],
    [
        "disloyal Customer", "Eco Plus", "Personal Travel", "45", "1500", "4", "5", "3", "5",
        "4", "5", "5", "4", "5", "5", "4", "5", "20", "25",
    ],
    [
        "Loyal Customer", "Business", "Business travel", "60", "200", "5", "1", "5", "2", "4",
        "4", "2", "5", "1", "3", "5", "1", "100", "200",
    ],
    [
        "disloyal Customer", "Eco", "Personal Travel", "25", "1000", "2", "3", "1", "3", "2",
        "3", "3", "2", "3", "1", "3", "3", "5", "10",
    ],
    [
        "disloyal Customer", "Business", "Personal Travel", "40", "3000", "3", "2", "4", "1",
        "3", "2", "1", "3", "2", "2", "2", "2", "30", "40",
    ],
];

pub fn write_template<W: Write>(writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPECTED_COLUMNS)?;
    for row in TEMPLATE_ROWS {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn template_csv() -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_template(&mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
