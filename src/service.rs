//! Report orchestration across scanner backends and the local catalog
//!
//! Every operation acts on behalf of a user. The owning company is always
//! derived from that user's membership at call time, never supplied by the
//! caller, so one company cannot write into another's catalog.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::client::models::{GeneratedReport, ReportSet, ScanSet};
use crate::client::{AcunetixClient, BackendKind, ReportBackend, Transport, ZapClient};
use crate::error::{ApiError, Result};
use crate::reconcile::{Resolution, ScanIdMap, resolve};
use crate::store::{
    Directory, NewReport, PersistedReport, ReportCatalog, ScannerSetting, StoreResult,
};

/// Outcome of a report generation.
///
/// `report` is always present once the backend produced an artifact.
/// Catalog bookkeeping can fail independently; in that case `persisted` is
/// `None` and `warnings` explains why.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub report: GeneratedReport,
    pub persisted: Option<PersistedReport>,
    pub warnings: Vec<String>,
}

/// Outcome of asking a cursor backend to create a report
#[derive(Debug, Clone, Serialize)]
pub struct CreatedReport {
    #[serde(flatten)]
    pub resolution: Resolution,
    /// Problems hit while listing scans to build the target index
    pub warnings: Vec<String>,
}

/// Orchestrates scanner calls and catalog writes for one process.
pub struct ReportService {
    directory: Arc<dyn Directory>,
    catalog: Arc<dyn ReportCatalog>,
    transport: Arc<dyn Transport>,
    page_size: usize,
}

impl ReportService {
    pub fn new(
        directory: Arc<dyn Directory>,
        catalog: Arc<dyn ReportCatalog>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            directory,
            catalog,
            transport,
            page_size: crate::client::pagination::DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size used for cursor-paginated listings
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn acunetix(&self, setting: &ScannerSetting) -> AcunetixClient {
        AcunetixClient::new(self.transport.clone(), setting).with_page_size(self.page_size)
    }

    /// Build the client for whichever backend the setting belongs to
    fn backend(&self, setting: &ScannerSetting) -> Box<dyn ReportBackend> {
        match setting.scanner {
            BackendKind::Acunetix => Box::new(self.acunetix(setting)),
            BackendKind::Zap => Box::new(ZapClient::new(self.transport.clone(), setting)),
        }
    }

    fn setting_for(&self, user_id: Uuid, kind: BackendKind) -> Result<ScannerSetting> {
        let user = self.directory.user(user_id)?;
        Ok(self.directory.scanner_setting(user.company_id, kind)?)
    }

    /// Walk every report on the user's company scanner, with download links filled in.
    pub async fn list_remote_reports(
        &self,
        user_id: Uuid,
        kind: BackendKind,
        cancel: &CancellationToken,
    ) -> Result<ReportSet> {
        let setting = self.setting_for(user_id, kind)?;
        let set = self.backend(&setting).list_reports(cancel).await?;

        if !set.complete {
            warn!(
                "{} report listing is incomplete: {}",
                kind,
                set.warnings.join("; ")
            );
        }

        Ok(set)
    }

    /// Walk every Acunetix scan for the user's company.
    pub async fn list_acunetix_scans(
        &self,
        user_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<ScanSet> {
        let setting = self.setting_for(user_id, BackendKind::Acunetix)?;
        self.acunetix(&setting).list_scans(cancel).await
    }

    /// Create an Acunetix report covering the scans of the given targets.
    ///
    /// Targets with no known scan are skipped. If none resolve, nothing is
    /// sent and [`ApiError::NoResolvedScans`] is returned.
    pub async fn create_acunetix_report(
        &self,
        user_id: Uuid,
        targets: &[String],
        cancel: &CancellationToken,
    ) -> Result<CreatedReport> {
        let setting = self.setting_for(user_id, BackendKind::Acunetix)?;
        let client = self.acunetix(&setting);

        let scans = client.list_scans(cancel).await?;
        let index = ScanIdMap::from_scans(&scans.items);
        debug!(
            "Indexed {} targets from {} scans",
            index.len(),
            scans.items.len()
        );
        let resolution = resolve(targets, &index);

        if resolution.scan_ids.is_empty() {
            return Err(ApiError::NoResolvedScans.into());
        }

        client.create_report(&resolution.scan_ids, cancel).await?;

        Ok(CreatedReport {
            resolution,
            warnings: scans.warnings,
        })
    }

    /// Generate a report on the given backend and record it in the catalog.
    ///
    /// Backend failures are returned as errors. Once the artifact exists,
    /// failing to resolve the user's company or to write the catalog row
    /// only adds a warning to the outcome.
    pub async fn generate_report(
        &self,
        user_id: Uuid,
        kind: BackendKind,
        title: &str,
        sites: &[String],
        cancel: &CancellationToken,
    ) -> Result<GenerationOutcome> {
        let setting = self.directory.scanner_setting_for_user(user_id, kind)?;
        let report = self
            .backend(&setting)
            .generate_report(title, sites, cancel)
            .await?;

        let mut outcome = GenerationOutcome {
            report,
            persisted: None,
            warnings: Vec::new(),
        };

        let user = match self.directory.user(user_id) {
            Ok(user) => user,
            Err(e) => {
                warn!(
                    "Error getting user {}: {} - Cannot save report to catalog",
                    user_id, e
                );
                outcome
                    .warnings
                    .push(format!("report generated but not cataloged: {}", e));
                return Ok(outcome);
            }
        };

        match self.persist(
            user.company_id,
            title,
            &outcome.report.artifact_path,
            kind,
        ) {
            Ok(persisted) => {
                info!("Report saved to catalog with ID: {}", persisted.id);
                outcome.persisted = Some(persisted);
            }
            Err(e) => {
                warn!("Error saving report to catalog: {} - Report generated but not saved", e);
                outcome
                    .warnings
                    .push(format!("report generated but not cataloged: {}", e));
            }
        }

        Ok(outcome)
    }

    /// Write a new catalog row for an artifact. Never updates an existing row.
    pub fn persist(
        &self,
        company_id: Uuid,
        title: &str,
        artifact_path: &str,
        kind: BackendKind,
    ) -> StoreResult<PersistedReport> {
        self.catalog.insert_report(NewReport {
            name: title.to_string(),
            company_id,
            download_link: normalize_download_link(artifact_path),
            report_type: kind,
        })
    }

    /// Catalog rows of the given type owned by the user's company
    pub fn list_reports(&self, user_id: Uuid, kind: BackendKind) -> Result<Vec<PersistedReport>> {
        let user = self.directory.user(user_id)?;
        let reports = self.catalog.list_reports(user.company_id, kind)?;
        info!(
            "Retrieved {} {} reports for user {}",
            reports.len(),
            kind,
            user_id
        );
        Ok(reports)
    }
}

/// Trim whitespace and control characters a backend may leave around a path.
fn normalize_download_link(artifact_path: &str) -> String {
    artifact_path
        .trim_matches(|c: char| c.is_whitespace() || c.is_control())
        .to_string()
}
