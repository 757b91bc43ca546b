use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use tracing::{info, instrument, warn};

use crate::ispiri::tools::config::StandardizeConfig;
use crate::ispiri::tools::error::{Result, ToolError};
use crate::ispiri::tools::io::TabularFormat;
use crate::ispiri::tools::standardize::{FileReport, report_failure, standardize_file};

/// Outcome of standardizing every report in a folder.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<FileReport>,
    pub failed: Vec<(PathBuf, ToolError)>,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }
}

/// Lists the `.xlsx` then `.csv` files directly inside `folder`, leaving out `base`.
pub fn discover_files(base: &Path, folder: &Path) -> Result<Vec<PathBuf>> {
    let escaped = Pattern::escape(&folder.to_string_lossy());
    let base_identity = path_identity(base);

    let mut files = Vec::new();
    for format in TabularFormat::ALL {
        let pattern = format!("{escaped}/*.{}", format.extension());
        let entries =
            glob(&pattern).map_err(|e| ToolError::InvalidWorkbook(format!("{pattern}: {e}")))?;
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(error) => {
                    warn!(path = %error.path().display(), %error, "skipping unreadable entry");
                    continue;
                }
            };
            if !path.is_file() || path_identity(&path) == base_identity {
                continue;
            }
            files.push(path);
        }
    }

    Ok(files)
}

fn path_identity(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Standardizes every report in `folder` against `base`, one file at a time.
///
/// A failing file is logged and recorded; the remaining files still run.
#[instrument(
    level = "info",
    skip_all,
    fields(base = %base.display(), folder = %folder.display())
)]
pub fn standardize_folder(
    base: &Path,
    folder: &Path,
    config: &StandardizeConfig,
) -> Result<BatchReport> {
    let files = discover_files(base, folder)?;
    let mut report = BatchReport::default();
    if files.is_empty() {
        warn!("no .xlsx or .csv files found");
        return Ok(report);
    }

    info!(file_count = files.len(), "standardizing folder");
    for path in files {
        info!(path = %path.display(), "processing file");
        match standardize_file(base, &path, config) {
            Ok(file_report) => report.succeeded.push(file_report),
            Err(failure) => {
                report_failure(&path, &failure);
                report.failed.push((path, failure));
            }
        }
    }

    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "folder finished"
    );
    Ok(report)
}
