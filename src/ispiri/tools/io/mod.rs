//! Spreadsheet adapters. Reading accepts `.csv` and `.xlsx`; writing only `.xlsx`.

use std::path::Path;

use crate::ispiri::tools::error::{Result, ToolError};
use crate::ispiri::tools::model::Workbook;

pub mod csv_read;
pub mod excel_read;
pub mod excel_write;

/// Sheet name given to the single table of a CSV file.
pub const CSV_SHEET_NAME: &str = "Sheet1";

/// File formats the tool understands, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Xlsx,
}

impl TabularFormat {
    /// Every supported extension, in discovery order.
    pub const ALL: [TabularFormat; 2] = [TabularFormat::Xlsx, TabularFormat::Csv];

    pub fn extension(self) -> &'static str {
        match self {
            TabularFormat::Csv => "csv",
            TabularFormat::Xlsx => "xlsx",
        }
    }

    /// Detects the format from the path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(TabularFormat::Csv),
            "xlsx" => Ok(TabularFormat::Xlsx),
            _ => Err(ToolError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: format!(".{extension}"),
            }),
        }
    }
}

/// Loads every sheet of a `.csv` or `.xlsx` file.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    match TabularFormat::from_path(path)? {
        TabularFormat::Csv => csv_read::read_workbook(path),
        TabularFormat::Xlsx => excel_read::read_workbook(path),
    }
}

/// Saves a workbook; only `.xlsx` targets are accepted.
pub fn write_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    match TabularFormat::from_path(path)? {
        TabularFormat::Xlsx => excel_write::write_workbook(path, workbook),
        TabularFormat::Csv => Err(ToolError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ".csv".to_string(),
        }),
    }
}
