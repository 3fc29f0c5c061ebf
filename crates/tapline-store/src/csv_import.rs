//! Bulk CSV import
//!
//! Accepts survey spreadsheets exported from the field, where column
//! order and header spelling vary between offices. Headers are matched
//! case-insensitively against a set of known aliases; unrecognized
//! columns are ignored and ragged rows are tolerated.

use csv::ReaderBuilder;
use tapline_domain::ConnectionRecord;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
    #[error("CSV file has no header row")]
    NoHeader,
    #[error("No recognizable columns in header: expected one of list, reference, surname, name, phone, address, location")]
    NoKnownColumns,
}

/// Outcome of a bulk import: the parsed records plus how many rows were
/// dropped for being entirely blank.
#[derive(Debug)]
pub struct CsvImport {
    pub records: Vec<ConnectionRecord>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    ListNo,
    Reference,
    Surname,
    FirstName,
    Phone,
    Phone2,
    Address,
    Location,
}

fn classify(header: &str) -> Option<Column> {
    let key: String = header
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    match key.as_str() {
        "list" | "listno" | "listnumber" | "batch" => Some(Column::ListNo),
        "reference" | "ref" | "refno" | "hcref" => Some(Column::Reference),
        "surname" | "lastname" => Some(Column::Surname),
        "name" | "firstname" | "othernames" => Some(Column::FirstName),
        "phone" | "phone1" | "mobile" | "tel" | "contact" => Some(Column::Phone),
        "phone2" | "mobile2" => Some(Column::Phone2),
        "address" => Some(Column::Address),
        "location" | "city" | "village" | "region" => Some(Column::Location),
        _ => None,
    }
}

/// Parse CSV text into connection records.
///
/// Every imported record lands in `batch`, regardless of any list column
/// in the file. Rows whose recognized cells are all blank are skipped.
pub fn import_csv(data: &str, batch: &str) -> Result<CsvImport, CsvError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let headers = reader.headers().map_err(|_| CsvError::NoHeader)?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(classify).collect();
    if !columns.iter().any(Option::is_some) {
        return Err(CsvError::NoKnownColumns);
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row?;
        let mut record = ConnectionRecord::new(batch);
        let mut populated = false;
        for (idx, column) in columns.iter().enumerate() {
            let (Some(column), Some(value)) = (column, row.get(idx)) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            populated = true;
            match column {
                // The target batch wins over whatever the file says.
                Column::ListNo => {}
                Column::Reference => record.reference = value.to_string(),
                Column::Surname => record.surname = value.to_string(),
                Column::FirstName => record.name = value.to_string(),
                Column::Phone => record.phone1 = value.to_string(),
                Column::Phone2 => record.phone2 = value.to_string(),
                Column::Address => record.address = value.to_string(),
                Column::Location => record.location = value.to_string(),
            }
        }
        if populated {
            records.push(record);
        } else {
            skipped += 1;
        }
    }

    debug!(
        imported = records.len(),
        skipped, batch, "parsed CSV import"
    );
    Ok(CsvImport { records, skipped })
}
