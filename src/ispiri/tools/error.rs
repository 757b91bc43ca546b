use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool reads, reconciles, or writes report workbooks.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a CSV report cannot be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when a configuration file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a path carries an extension the tool cannot read or write.
    #[error("unsupported file format '{extension}' for {path}; use .csv or .xlsx files")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Raised when the target workbook lacks a sheet the base workbook has.
    #[error("sheet '{0}' is missing from the target workbook")]
    MissingSheet(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the output file is locked, read-only, or otherwise not writable.
    #[error("could not save the file '{}': {source}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the interactive path prompt fails.
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    /// Returns `true` when the failure stems from missing file permissions,
    /// whichever layer reported it.
    pub fn is_permission_denied(&self) -> bool {
        let io_error = match self {
            ToolError::PermissionDenied { .. } => return true,
            ToolError::Io(error) => Some(error),
            ToolError::ExcelWrite(rust_xlsxwriter::XlsxError::IoError(error)) => Some(error),
            ToolError::ExcelRead(calamine::XlsxError::Io(error)) => Some(error),
            ToolError::Csv(error) => match error.kind() {
                csv::ErrorKind::Io(error) => Some(error),
                _ => None,
            },
            _ => None,
        };
        io_error.is_some_and(|error| error.kind() == ErrorKind::PermissionDenied)
    }
}
