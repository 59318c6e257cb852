//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

use crate::client::BackendKind;

pub mod args;
pub mod context;
pub mod init;
pub mod report;
pub mod scan;
pub mod setting;
pub mod status;

pub use args::OutputFormat;
pub use context::CommandContext;

/// scanvault - company-scoped report catalog for Acunetix and ZAP
#[derive(Parser, Debug)]
#[command(name = "scanvault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json); defaults to the config preference, then table
    #[arg(long, global = true, env = "SCANVAULT_FORMAT", hide_env = true)]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "SCANVAULT_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override catalog database location
    #[arg(long, global = true, env = "SCANVAULT_DB", hide_env = true)]
    pub db: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "SCANVAULT_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register your company and user, and write the config file
    Init {
        /// Company name (created if it does not exist)
        #[arg(long)]
        company: Option<String>,

        /// Your email address
        #[arg(long)]
        email: Option<String>,

        /// Your display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Show configuration and scanner status
    Status,

    /// Display version information
    Version,

    /// Manage scanner connection settings
    #[command(subcommand)]
    Setting(SettingCommands),

    /// Browse Acunetix scans
    #[command(subcommand)]
    Scan(ScanCommands),

    /// List, create and generate scan reports
    #[command(subcommand)]
    Report(ReportCommands),
}

/// Scanner setting subcommands
#[derive(Subcommand, Debug)]
pub enum SettingCommands {
    /// Create or update a scanner's connection settings.
    /// Flags left out keep their stored values.
    Set {
        /// Scanner to configure
        #[arg(value_enum)]
        scanner: BackendKind,

        /// Scanner base URL (e.g. https://scanner.internal)
        #[arg(long)]
        url: Option<String>,

        /// Scanner port
        #[arg(long)]
        port: Option<u16>,

        /// Scanner API key
        #[arg(long, env = "SCANVAULT_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Show the scanners configured for your company
    Show,
}

/// Scan subcommands
#[derive(Subcommand, Debug)]
pub enum ScanCommands {
    /// List every scan on the company's Acunetix scanner
    List,
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// List reports.
    /// Acunetix reports are fetched from the scanner; ZAP reports come from the local catalog.
    List {
        /// Backend to list reports for
        #[arg(long, value_enum, default_value = "acunetix")]
        backend: BackendKind,
    },

    /// List reports recorded in the local catalog for your company
    Catalog {
        /// Restrict to one backend
        #[arg(long, value_enum)]
        backend: Option<BackendKind>,
    },

    /// Ask Acunetix to create a report for the scans of the given targets
    Create {
        /// Target address (repeatable)
        #[arg(long = "target", required = true)]
        targets: Vec<String>,
    },

    /// Generate a ZAP report and record it in the catalog
    Generate {
        /// Report title; also used as the file name
        #[arg(long)]
        title: String,

        /// Site to include (repeatable)
        #[arg(long = "site", required = true)]
        sites: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_generate() {
        let cli = Cli::parse_from([
            "scanvault",
            "report",
            "generate",
            "--title",
            "weekly",
            "--site",
            "http://a.example",
            "--site",
            "http://b.example",
        ]);

        match cli.command {
            Commands::Report(ReportCommands::Generate { title, sites }) => {
                assert_eq!(title, "weekly");
                assert_eq!(sites, vec!["http://a.example", "http://b.example"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_setting_set_partial() {
        let cli = Cli::parse_from(["scanvault", "setting", "set", "zap", "--port", "8090"]);

        match cli.command {
            Commands::Setting(SettingCommands::Set {
                scanner, url, port, ..
            }) => {
                assert_eq!(scanner, BackendKind::Zap);
                assert_eq!(url, None);
                assert_eq!(port, Some(8090));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_report_create_requires_target() {
        assert!(Cli::try_parse_from(["scanvault", "report", "create"]).is_err());
    }
}
