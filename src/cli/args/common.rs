//! Common CLI types shared across commands

use serde::{Deserialize, Serialize};

/// Output format options
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format - rounded table for humans (default)
    #[default]
    Table,
    /// JSON format - structured for scripts, wrapped in a data/meta envelope
    Json,
}
