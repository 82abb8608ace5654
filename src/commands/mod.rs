//! Command implementations

pub mod logging;
pub mod vcl;

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::cli::Commands;
use crate::config::Globals;
use crate::error::FastlyError;

pub async fn run(command: Commands, globals: &Globals, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Logging(cmd) => logging::run(cmd, globals, out).await,
        Commands::Vcl(cmd) => vcl::run(cmd, globals, out).await,
    }
}

/// `--verbose` and `--json` produce incompatible output.
pub(crate) fn check_output_flags(globals: &Globals, json: bool) -> Result<(), FastlyError> {
    if globals.verbose && json {
        return Err(FastlyError::InvalidVerboseJsonCombo);
    }
    Ok(())
}

/// A flag value that is either a path to a file or the content itself.
pub(crate) fn content(value: &str) -> String {
    let path = Path::new(value);
    if path.is_file() {
        if let Ok(data) = std::fs::read_to_string(path) {
            return data;
        }
    }
    value.to_string()
}
