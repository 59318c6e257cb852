//! Display models for CLI output
//!
//! Converts scanner descriptors and catalog rows into table-friendly rows.

pub mod display;

pub use display::{CatalogDisplay, RemoteReportDisplay, ScanDisplay, SettingDisplay};
