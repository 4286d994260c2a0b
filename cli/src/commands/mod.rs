//! CLI command implementations
//!
//! Each command module implements one nestql subcommand.

pub mod check;
pub mod compile;
pub mod query;

use std::path::Path;

use nestql::Filter;

use crate::error::CliError;

/// Reads the filter from `--filter-file` when given, else from `--filter`.
pub fn read_filter(inline: Option<&str>, file: Option<&Path>) -> Result<Filter, CliError> {
    let text = match (inline, file) {
        (_, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| CliError::IoError(format!("{}: {e}", path.display())))?,
        (Some(inline), None) => inline.to_string(),
        (None, None) => return Ok(Filter::default()),
    };
    Ok(text.parse()?)
}
