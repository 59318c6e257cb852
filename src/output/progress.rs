//! Spinners for long-running scanner calls

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::cli::OutputFormat;

/// Spinner shown while waiting on a scanner.
///
/// JSON output stays clean: the spinner is hidden unless the table format is
/// in use.
pub fn spinner(format: OutputFormat, message: &str) -> ProgressBar {
    let pb = match format {
        OutputFormat::Table => ProgressBar::new_spinner(),
        OutputFormat::Json => ProgressBar::hidden(),
    };

    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
