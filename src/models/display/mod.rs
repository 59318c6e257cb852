//! Display model implementations for table and JSON output

mod common;
mod report;
mod scan;
mod setting;

pub use report::{CatalogDisplay, RemoteReportDisplay};
pub use scan::ScanDisplay;
pub use setting::SettingDisplay;
