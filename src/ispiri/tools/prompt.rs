use std::path::PathBuf;

use dialoguer::Input;

use crate::ispiri::tools::error::{Result, ToolError};

/// Asks the operator for a path on the terminal.
pub fn ask_path(prompt: &str) -> Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| ToolError::Prompt(e.to_string()))?;
    Ok(clean_path_input(&input))
}

/// Trims whitespace and surrounding quotes left over from drag-and-drop or
/// "copy as path".
pub fn clean_path_input(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_matches(|c| c == '"' || c == '\''))
}
