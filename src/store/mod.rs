//! Company-scoped local catalog
//!
//! Holds the minimal identity data (companies, users), per-company scanner
//! settings, and the persisted report records. Callers depend on the
//! [`Directory`] and [`ReportCatalog`] traits; [`Store`] is the SQLite
//! implementation of both.

pub mod storage;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::client::BackendKind;
use crate::error::StoreError;

pub use storage::Store;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Tenancy boundary for users, settings and reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
}

/// A user and the company they belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub company_id: Uuid,
}

/// Connection parameters for one scanner, owned by one company
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannerSetting {
    pub company_id: Uuid,
    pub scanner: BackendKind,
    pub scanner_url: String,
    pub scanner_port: u16,
    #[serde(skip_serializing)]
    pub api_key: String,
}

impl ScannerSetting {
    /// `scheme://host:port` with no trailing slash.
    ///
    /// A bare host is assumed to be HTTPS; a zero port is left out.
    pub fn base_url(&self) -> String {
        let url = self.scanner_url.trim().trim_end_matches('/');
        let url = if url.contains("://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        };

        if self.scanner_port == 0 {
            url
        } else {
            format!("{}:{}", url, self.scanner_port)
        }
    }
}

/// Partial update for a scanner setting; `None`, empty and zero keep the stored value
#[derive(Debug, Clone, Default)]
pub struct SettingUpdate {
    pub scanner_url: Option<String>,
    pub scanner_port: Option<u16>,
    pub api_key: Option<String>,
}

/// A report to be written to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub name: String,
    pub company_id: Uuid,
    pub download_link: String,
    pub report_type: BackendKind,
}

/// A catalog entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedReport {
    pub id: Uuid,
    pub name: String,
    pub company_id: Uuid,
    pub download_link: String,
    pub report_type: BackendKind,
    pub created_at: DateTime<Utc>,
}

/// Read access to identity and scanner settings
pub trait Directory: Send + Sync {
    fn user(&self, user_id: Uuid) -> StoreResult<User>;

    fn scanner_setting(&self, company_id: Uuid, scanner: BackendKind)
    -> StoreResult<ScannerSetting>;

    /// Settings for the company the user currently belongs to
    fn scanner_setting_for_user(
        &self,
        user_id: Uuid,
        scanner: BackendKind,
    ) -> StoreResult<ScannerSetting> {
        let user = self.user(user_id)?;
        self.scanner_setting(user.company_id, scanner)
    }
}

/// Append-only report catalog
pub trait ReportCatalog: Send + Sync {
    /// Insert a new record. Repeated names produce separate rows.
    fn insert_report(&self, report: NewReport) -> StoreResult<PersistedReport>;

    /// Every record owned by `company_id` with the given report type
    fn list_reports(
        &self,
        company_id: Uuid,
        report_type: BackendKind,
    ) -> StoreResult<Vec<PersistedReport>>;
}
