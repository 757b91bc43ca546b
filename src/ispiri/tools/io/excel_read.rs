use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::ispiri::tools::error::{Result, ToolError};
use crate::ispiri::tools::model::{Cell, Sheet, Workbook};

/// Reads every worksheet of an `.xlsx` file, preserving sheet order and names.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut sheets = Workbook::new();
    for name in sheet_names {
        let range = read_required_sheet(&mut workbook, &name)?;
        let sheet = range_to_sheet(&name, &range);
        debug!(sheet = %name, rows = sheet.height(), columns = sheet.width(), "sheet loaded");
        sheets.insert(sheet);
    }

    Ok(sheets)
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

/// Lays the used range out from A1, so leading blank rows and columns keep
/// their positions. The first physical row becomes the structural labels.
fn range_to_sheet(name: &str, range: &Range<DataType>) -> Sheet {
    let (Some((start_row, start_col)), Some((end_row, end_col))) = (range.start(), range.end())
    else {
        return Sheet::new(name, Vec::new(), Vec::new());
    };

    let height = end_row as usize + 1;
    let width = end_col as usize + 1;
    let mut grid = vec![vec![Cell::Empty; width]; height];
    for (row, col, value) in range.cells() {
        grid[start_row as usize + row][start_col as usize + col] = cell_from_data(value);
    }

    let mut rows = grid.into_iter();
    let columns = rows
        .next()
        .map(|labels| labels.iter().map(Cell::label).collect())
        .unwrap_or_default();
    Sheet::new(name, columns, rows.collect())
}

fn cell_from_data(value: &DataType) -> Cell {
    match value {
        DataType::String(value) => Cell::from(value.as_str()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::DateTime(value) => Cell::DateTime(*value),
        DataType::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}
