use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ispiri_tools::config::{DuplicateLabelPolicy, StandardizeConfig};
use ispiri_tools::{Result, ToolError, batch, prompt, standardize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stdout)
        .try_init()
        .map_err(|e| ToolError::Logging(e.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    let (base, target) = match <[PathBuf; 2]>::try_from(cli.paths) {
        Ok([base, target]) => (base, target),
        Err(_) => {
            warn!(
                "no valid command-line arguments detected; please provide the paths interactively"
            );
            let base = prompt::ask_path("Enter the path to the base file (.xlsx or .csv)")?;
            let target = prompt::ask_path("Enter the path to the new file or folder")?;
            (base, target)
        }
    };

    if target.is_dir() {
        let report = batch::standardize_folder(&base, &target, &config)?;
        for (path, _) in &report.failed {
            info!(path = %path.display(), "file was not standardized");
        }
    } else if standardize::run_file(&base, &target, &config).is_some() {
        info!("all sheets have their column headers replaced");
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Align the columns of report workbooks to a base report's layout.",
    long_about = "Align the columns of report workbooks to a base report's layout.\n\n\
        Usage: ispiri-tools <BASE_FILE> <NEW_FILE>  or  ispiri-tools <BASE_FILE> <FOLDER>.\n\
        The new file (or every .xlsx/.csv file in the folder) is overwritten in place. \
        Without two paths the tool asks for them interactively."
)]
struct Cli {
    /// Base report followed by the report (or folder of reports) to standardize.
    paths: Vec<PathBuf>,

    /// JSON file with standardization settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Zero-based row (below the first row) holding the column headers.
    #[arg(long)]
    header_row: Option<usize>,

    /// Title written into the first column label of every sheet.
    #[arg(long)]
    title: Option<String>,

    /// Sheet copied through without reconciliation. Repeat for several sheets.
    #[arg(long = "passthrough-sheet")]
    passthrough_sheets: Vec<String>,

    /// Which target column wins when a header label repeats.
    #[arg(long, value_enum)]
    duplicate_labels: Option<DuplicateLabels>,

    /// Ignore `.N` duplicate suffixes when matching header labels.
    #[arg(long)]
    strip_label_suffixes: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DuplicateLabels {
    First,
    Last,
}

impl From<DuplicateLabels> for DuplicateLabelPolicy {
    fn from(kind: DuplicateLabels) -> Self {
        match kind {
            DuplicateLabels::First => DuplicateLabelPolicy::First,
            DuplicateLabels::Last => DuplicateLabelPolicy::Last,
        }
    }
}

impl Cli {
    fn resolve_config(&self) -> Result<StandardizeConfig> {
        let mut config = match &self.config {
            Some(path) if !path.exists() => return Err(ToolError::MissingInput(path.clone())),
            Some(path) => StandardizeConfig::load(path)?,
            None => StandardizeConfig::default(),
        };

        if let Some(header_row) = self.header_row {
            config.header_row = header_row;
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if !self.passthrough_sheets.is_empty() {
            config.passthrough_sheets = self.passthrough_sheets.clone();
        }
        if let Some(policy) = self.duplicate_labels {
            config.duplicate_labels = policy.into();
        }
        if self.strip_label_suffixes {
            config.strip_label_suffixes = true;
        }
        Ok(config)
    }
}
