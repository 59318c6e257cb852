//! Wire and result models for scanner backends

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A report as listed by the Acunetix reports endpoint.
///
/// The backend never returns a directly fetchable link, so `download` is
/// replaced with a synthesized URL once the walk completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDescriptor {
    pub report_id: String,

    #[serde(default)]
    pub generation_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub template_id: String,

    #[serde(default)]
    pub template_name: String,

    #[serde(default)]
    pub template_type: i64,

    #[serde(default)]
    pub source: ReportSource,

    #[serde(default)]
    pub download: Vec<String>,
}

/// What a report was built from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSource {
    #[serde(default)]
    pub list_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub id_list: Vec<String>,
}

/// A scan as listed by the Acunetix scans endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanDescriptor {
    pub scan_id: String,

    #[serde(default)]
    pub target_id: String,

    #[serde(default)]
    pub target: ScanTarget,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_session: Option<ScanSession>,
}

impl ScanDescriptor {
    /// Status of the latest scan session, if the backend reported one
    pub fn status(&self) -> Option<&str> {
        self.current_session.as_ref().map(|s| s.status.as_str())
    }
}

/// Target a scan ran against
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanTarget {
    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub description: String,
}

/// Latest session of a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSession {
    #[serde(default)]
    pub status: String,
}

/// Body for `POST /api/v1/reports`
#[derive(Debug, Clone, Serialize)]
pub struct CreateReportRequest<'a> {
    pub template_id: &'a str,
    pub source: CreateReportSource<'a>,
}

/// Source block of a report creation request
#[derive(Debug, Clone, Serialize)]
pub struct CreateReportSource<'a> {
    pub list_type: &'a str,
    pub id_list: &'a [String],
}

/// Response of the ZAP report generation action
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub generate: String,
}

/// Items collected by walking a cursor-paginated listing.
///
/// `complete` is false when any page came back with a non-success status,
/// failed to decode, or repeated a cursor; `warnings` says which.
#[derive(Debug, Clone, Serialize)]
pub struct PageSet<T> {
    pub items: Vec<T>,
    pub pages: usize,
    pub complete: bool,
    pub warnings: Vec<String>,
}

impl<T> Default for PageSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pages: 0,
            complete: true,
            warnings: Vec::new(),
        }
    }
}

impl<T> PageSet<T> {
    /// Record a page problem that leaves the set incomplete
    pub fn flag(&mut self, warning: String) {
        self.complete = false;
        self.warnings.push(warning);
    }
}

/// Every report listed by a cursor backend
pub type ReportSet = PageSet<ReportDescriptor>;

/// Every scan listed by a cursor backend
pub type ScanSet = PageSet<ScanDescriptor>;

/// Result of a single-shot report generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedReport {
    pub artifact_path: String,
    pub title: String,
    pub sites: Vec<String>,
}
