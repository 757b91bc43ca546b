use std::path::Path;

use csv::ReaderBuilder;

use crate::ispiri::tools::error::Result;
use crate::ispiri::tools::io::CSV_SHEET_NAME;
use crate::ispiri::tools::model::{Cell, Sheet, Workbook};

/// Reads a CSV file as a single-sheet workbook. The first record becomes the
/// structural column labels.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records = reader.records();
    let columns: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(record.iter().map(Cell::infer).collect());
    }

    let mut workbook = Workbook::new();
    workbook.insert(Sheet::new(CSV_SHEET_NAME, columns, rows));
    Ok(workbook)
}
