//! Scanner backend clients
//!
//! Each scanning engine gets its own client built on top of a shared
//! [`Transport`]. The clients expose a common [`ReportBackend`] surface; an
//! engine that cannot perform an operation reports [`ApiError::Unsupported`]
//! instead of silently doing nothing.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, Result};

pub mod acunetix;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod transport;
pub mod zap;

pub use acunetix::AcunetixClient;
pub use models::{GeneratedReport, ReportDescriptor, ReportSet, ScanDescriptor};
pub use transport::{HttpTransport, Transport};
pub use zap::ZapClient;

/// The closed set of scanning engines scanvault knows how to talk to.
///
/// The serialized form doubles as the report-type tag stored in the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum BackendKind {
    /// Cursor-paginated REST engine
    Acunetix,
    /// Token query-string engine with synchronous report generation
    Zap,
}

impl BackendKind {
    /// Tag written to the `report_type` / `scanner` columns
    pub fn tag(&self) -> &'static str {
        match self {
            BackendKind::Acunetix => "ACUNETIX",
            BackendKind::Zap => "ZAP",
        }
    }

    /// Parse a stored tag back into a backend kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ACUNETIX" => Some(BackendKind::Acunetix),
            "ZAP" => Some(BackendKind::Zap),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Report operations shared by all scanner backends.
///
/// Every call takes a cancellation token that must be honoured by each
/// outbound request the backend makes.
#[async_trait]
pub trait ReportBackend: Send + Sync {
    /// Which engine this client talks to
    fn kind(&self) -> BackendKind;

    /// Walk every report the backend knows about
    async fn list_reports(&self, _cancel: &CancellationToken) -> Result<ReportSet> {
        Err(unsupported(self.kind(), "list_reports"))
    }

    /// Ask the backend to build a report over the given native scan ids
    async fn create_report(&self, _scan_ids: &[String], _cancel: &CancellationToken) -> Result<()> {
        Err(unsupported(self.kind(), "create_report"))
    }

    /// Generate a report artifact in a single round trip
    async fn generate_report(
        &self,
        _title: &str,
        _sites: &[String],
        _cancel: &CancellationToken,
    ) -> Result<GeneratedReport> {
        Err(unsupported(self.kind(), "generate_report"))
    }
}

fn unsupported(backend: BackendKind, operation: &'static str) -> crate::error::Error {
    ApiError::Unsupported { backend, operation }.into()
}
