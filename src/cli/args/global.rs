//! Global CLI options shared across all commands

use tokio_util::sync::CancellationToken;

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// Precedence is CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; config file values are resolved
/// later in `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format from the flag or environment, if given
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.scanvault/config.yaml)
    pub config: Option<String>,

    /// Custom catalog database path
    pub db: Option<String>,

    /// Cancelled on Ctrl-C; every scanner call observes it
    pub cancel: CancellationToken,
}

impl GlobalOptions {
    /// Called once in main.rs after parsing.
    pub fn from_cli(cli: &Cli, cancel: CancellationToken) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            db: cli.db.clone(),
            cancel,
        }
    }

    /// Flag or environment first, then the config preference, then table
    pub fn resolve_format(&self, preference: Option<OutputFormat>) -> OutputFormat {
        self.format.or(preference).unwrap_or_default()
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn db_ref(&self) -> Option<&str> {
        self.db.as_deref()
    }
}
