//! Scan display model

use serde::Serialize;
use tabled::Tabled;

use super::common::{or_dash, truncate_string};
use crate::client::ScanDescriptor;

/// Acunetix scan row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ScanDisplay {
    #[tabled(rename = "SCAN ID")]
    pub id: String,

    #[tabled(rename = "TARGET")]
    pub target: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "DESCRIPTION")]
    pub description: String,
}

impl From<ScanDescriptor> for ScanDisplay {
    fn from(scan: ScanDescriptor) -> Self {
        Self {
            status: scan.status().map(or_dash).unwrap_or_else(|| "--".to_string()),
            target: or_dash(&scan.target.address),
            description: or_dash(&truncate_string(&scan.target.description, 40)),
            id: scan.scan_id,
        }
    }
}
