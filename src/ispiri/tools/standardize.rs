use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};

use crate::ispiri::tools::config::StandardizeConfig;
use crate::ispiri::tools::error::{Result, ToolError};
use crate::ispiri::tools::io;
use crate::ispiri::tools::model::{Sheet, Workbook};
use crate::ispiri::tools::reconcile::{ReconcileOutcome, overwrite_title, reconcile_sheet};

/// Guidance shown when the target file cannot be written.
pub const PERMISSION_REMEDIATION: [&str; 3] = [
    "The file is not currently open in Excel",
    "You have write permissions for the file",
    "The file is not set to read-only",
];

/// What happened to a single sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetStatus {
    /// Rebuilt in the base layout; `unmatched` base columns had no target source.
    Reconciled { unmatched: usize },
    /// Copied through because its name is on the pass-through list.
    PassedThrough,
    /// Left as is because one side has no header row.
    TooShort,
}

/// Per-sheet column counts reported during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetReport {
    pub name: String,
    pub status: SheetStatus,
    pub base_columns: usize,
    pub target_columns: usize,
    pub standardized_columns: usize,
}

/// Output of [`standardize_workbook`].
#[derive(Debug)]
pub struct StandardizedWorkbook {
    pub workbook: Workbook,
    pub sheets: Vec<SheetReport>,
    /// Sheets that could not be produced; they are absent from `workbook`.
    pub failures: Vec<ToolError>,
}

/// Summary of one standardized file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub sheets: Vec<SheetReport>,
    pub failures: Vec<ToolError>,
}

/// Applies the base layout to every sheet the base workbook defines.
///
/// Output sheets follow the base workbook's order; target sheets the base does
/// not have are dropped. Pass-through sheets keep the target's content. A sheet
/// missing from the target is recorded as a failure and skipped.
pub fn standardize_workbook(
    base: &Workbook,
    target: &Workbook,
    config: &StandardizeConfig,
) -> StandardizedWorkbook {
    let mut workbook = Workbook::new();
    let mut sheets = Vec::new();
    let mut failures = Vec::new();

    for base_sheet in &base.sheets {
        let name = base_sheet.name.as_str();
        let Some(target_sheet) = target.sheet(name) else {
            let failure = ToolError::MissingSheet(name.to_string());
            warn!(sheet = name, %failure, "skipping sheet");
            failures.push(failure);
            continue;
        };

        let (sheet, status) = standardize_sheet(base_sheet, target_sheet, config);
        let sheet = overwrite_title(sheet, &config.title);

        let report = SheetReport {
            name: name.to_string(),
            status,
            base_columns: base_sheet.width(),
            target_columns: target_sheet.width(),
            standardized_columns: sheet.width(),
        };
        info!(
            sheet = name,
            base_columns = report.base_columns,
            new_columns = report.target_columns,
            standardized_columns = report.standardized_columns,
            "processed sheet"
        );

        sheets.push(report);
        workbook.insert(sheet);
    }

    StandardizedWorkbook {
        workbook,
        sheets,
        failures,
    }
}

fn standardize_sheet(
    base: &Sheet,
    target: &Sheet,
    config: &StandardizeConfig,
) -> (Sheet, SheetStatus) {
    if config.is_passthrough(&target.name) {
        return (target.clone(), SheetStatus::PassedThrough);
    }
    match reconcile_sheet(base, target, config) {
        ReconcileOutcome::Reconciled { sheet, unmatched } => {
            (sheet, SheetStatus::Reconciled { unmatched })
        }
        ReconcileOutcome::TooShort { sheet } => (sheet, SheetStatus::TooShort),
    }
}

/// Standardizes `target` against `base` and overwrites `target` in place.
///
/// The base file is read again on every call.
#[instrument(
    level = "info",
    skip_all,
    fields(base = %base.display(), target = %target.display())
)]
pub fn standardize_file(
    base: &Path,
    target: &Path,
    config: &StandardizeConfig,
) -> Result<FileReport> {
    for path in [base, target] {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
    }

    let base_workbook = io::read_workbook(base)?;
    let target_workbook = io::read_workbook(target)?;
    info!(
        base_sheets = base_workbook.sheets.len(),
        target_sheets = target_workbook.sheets.len(),
        "workbooks loaded"
    );

    let standardized = standardize_workbook(&base_workbook, &target_workbook, config);
    io::write_workbook(target, &standardized.workbook)?;
    info!(
        sheets = standardized.sheets.len(),
        skipped = standardized.failures.len(),
        "file standardized successfully"
    );

    Ok(FileReport {
        path: target.to_path_buf(),
        sheets: standardized.sheets,
        failures: standardized.failures,
    })
}

/// Runs [`standardize_file`], logging any failure instead of returning it.
pub fn run_file(base: &Path, target: &Path, config: &StandardizeConfig) -> Option<FileReport> {
    match standardize_file(base, target, config) {
        Ok(report) => Some(report),
        Err(failure) => {
            report_failure(target, &failure);
            None
        }
    }
}

/// Logs a file-level failure, adding remediation steps for permission problems.
pub fn report_failure(path: &Path, failure: &ToolError) {
    error!(path = %path.display(), %failure, "failed to standardize file");
    if failure.is_permission_denied() {
        warn!("please make sure that:");
        for (step, hint) in PERMISSION_REMEDIATION.iter().enumerate() {
            warn!("{}. {hint}", step + 1);
        }
        warn!("close the file if it is open and try again");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ispiri::tools::model::Cell;

    fn sheet(name: &str, header: &[&str], data: &[&str]) -> Sheet {
        let mut rows: Vec<Vec<Cell>> = (0..9).map(|_| vec![Cell::from("meta")]).collect();
        rows.push(header.iter().map(|label| Cell::from(*label)).collect());
        rows.push(data.iter().map(|value| Cell::from(*value)).collect());
        Sheet::new(name, vec!["original".into()], rows)
    }

    fn workbook(sheets: Vec<Sheet>) -> Workbook {
        Workbook { sheets }
    }

    #[test]
    fn passthrough_sheets_keep_target_content() {
        let base = workbook(vec![
            sheet("Doc info", &["Key"], &["base"]),
            sheet("Summary", &["Total"], &["1"]),
        ]);
        let target = workbook(vec![
            sheet("Summary", &["Other", "Total"], &["x", "2"]),
            sheet("Doc info", &["Value"], &["target"]),
        ]);
        let config = StandardizeConfig::default();

        let result = standardize_workbook(&base, &target, &config);

        assert!(result.failures.is_empty());
        assert_eq!(
            result.workbook.sheet_names().collect::<Vec<_>>(),
            vec!["Doc info", "Summary"]
        );
        for name in ["Doc info", "Summary"] {
            let output = result.workbook.sheet(name).expect("sheet present");
            let original = target.sheet(name).expect("target sheet");
            assert_eq!(output.rows, original.rows);
            assert_eq!(output.columns[0], config.title);
            assert!(output.columns[1..].iter().all(String::is_empty));
        }
        assert!(
            result
                .sheets
                .iter()
                .all(|report| report.status == SheetStatus::PassedThrough)
        );
    }

    #[test]
    fn missing_target_sheet_is_skipped_not_fatal() {
        let base = workbook(vec![
            sheet("Controls", &["A"], &["1"]),
            sheet("Risks", &["B"], &["2"]),
        ]);
        let target = workbook(vec![sheet("Risks", &["B"], &["3"])]);

        let result = standardize_workbook(&base, &target, &StandardizeConfig::default());

        assert!(matches!(
            result.failures.as_slice(),
            [ToolError::MissingSheet(name)] if name == "Controls"
        ));
        assert_eq!(result.workbook.sheet_names().collect::<Vec<_>>(), vec!["Risks"]);
        assert_eq!(
            result.sheets[0].status,
            SheetStatus::Reconciled { unmatched: 0 }
        );
    }

    #[test]
    fn reports_column_counts() {
        let base = workbook(vec![sheet("Data", &["A", "B", "C"], &[])]);
        let target = workbook(vec![sheet("Data", &["C", "X"], &["c", "x"])]);

        let result = standardize_workbook(&base, &target, &StandardizeConfig::default());
        let report = &result.sheets[0];

        assert_eq!(report.base_columns, 3);
        assert_eq!(report.target_columns, 2);
        assert_eq!(report.standardized_columns, 3);
        assert_eq!(report.status, SheetStatus::Reconciled { unmatched: 2 });

        let output = result.workbook.sheet("Data").expect("sheet present");
        assert_eq!(
            output.rows[10],
            vec![Cell::Empty, Cell::Empty, Cell::from("c")]
        );
    }
}
