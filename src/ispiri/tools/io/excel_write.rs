use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook as XlsxWorkbook, XlsxError};
use tracing::debug;

use crate::ispiri::tools::error::{Result, ToolError};
use crate::ispiri::tools::model::{Cell, Workbook};

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const DATE_FORMAT: &str = "yyyy-mm-dd";

/// Writes the workbook to `path`, one worksheet per sheet with the structural
/// labels in the first row.
///
/// The file is first saved next to the destination under a hidden temporary
/// name and then renamed over it, so a failed save leaves the existing file
/// untouched. A read-only destination is refused rather than replaced, and an
/// existing destination's permissions carry over to the new file.
pub fn write_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    if workbook.is_empty() {
        return Err(ToolError::InvalidWorkbook(format!(
            "refusing to write {} without any sheets",
            path.display()
        )));
    }

    let existing_permissions = match fs::metadata(path) {
        Ok(metadata) if metadata.permissions().readonly() => {
            return Err(ToolError::PermissionDenied {
                path: path.to_path_buf(),
                source: std::io::Error::new(ErrorKind::PermissionDenied, "file is read-only"),
            });
        }
        Ok(metadata) => Some(metadata.permissions()),
        Err(error) if error.kind() == ErrorKind::NotFound => None,
        Err(error) => return Err(classify_io_error(path, error)),
    };

    let mut workbook_writer = build_writer(workbook)?;
    let temp_path = temp_path_for(path);

    if let Err(error) = workbook_writer.save(&temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(classify_save_error(path, error));
    }
    if let Some(permissions) = existing_permissions {
        if let Err(error) = fs::set_permissions(&temp_path, permissions) {
            let _ = fs::remove_file(&temp_path);
            return Err(classify_io_error(path, error));
        }
    }
    if let Err(error) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(classify_io_error(path, error));
    }

    debug!(path = %path.display(), sheets = workbook.sheets.len(), "workbook saved");
    Ok(())
}

fn build_writer(workbook: &Workbook) -> Result<XlsxWorkbook> {
    let mut workbook_writer = XlsxWorkbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    for sheet in &workbook.sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col_idx, label) in sheet.columns.iter().enumerate() {
            if !label.is_empty() {
                worksheet.write_string_with_format(0, col_idx as u16, label, &header_format)?;
            }
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = col_idx as u16;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(value) if value.is_empty() => {}
                    Cell::Text(value) => {
                        worksheet.write_string(row_num, col_num, value)?;
                    }
                    Cell::Number(value) => {
                        worksheet.write_number(row_num, col_num, *value)?;
                    }
                    Cell::Bool(value) => {
                        worksheet.write_boolean(row_num, col_num, *value)?;
                    }
                    Cell::DateTime(value) => {
                        let format = if is_date_only(*value) {
                            &date_format
                        } else {
                            &datetime_format
                        };
                        worksheet.write_number_with_format(row_num, col_num, *value, format)?;
                    }
                }
            }
        }
    }

    Ok(workbook_writer)
}

/// Serials without a time-of-day part are written as plain dates.
fn is_date_only(serial: f64) -> bool {
    serial.fract() == 0.0
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook.xlsx".to_string());
    path.with_file_name(format!(".{file_name}.tmp"))
}

fn classify_save_error(path: &Path, error: XlsxError) -> ToolError {
    match error {
        XlsxError::IoError(error) => classify_io_error(path, error),
        other => ToolError::ExcelWrite(other),
    }
}

fn classify_io_error(path: &Path, error: std::io::Error) -> ToolError {
    if error.kind() == ErrorKind::PermissionDenied {
        ToolError::PermissionDenied {
            path: path.to_path_buf(),
            source: error,
        }
    } else {
        ToolError::Io(error)
    }
}
