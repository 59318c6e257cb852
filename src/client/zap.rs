//! ZAP backend: single-shot report generation
//!
//! ZAP generates the report inside the HTTP exchange and answers once with
//! the artifact path, so there is nothing to poll.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

use super::models::{GenerateResponse, GeneratedReport};
use super::transport::{DecodePolicy, OutboundRequest, Transport, send_cancellable};
use super::{BackendKind, ReportBackend};
use crate::error::{ApiError, Result};
use crate::store::ScannerSetting;

const GENERATE_PATH: &str = "/JSON/reports/action/generate/";

/// Report template requested from ZAP
const REPORT_TEMPLATE: &str = "modern";

/// Generation is an irreversible external action; a malformed answer is an error.
const GENERATE_DECODE: DecodePolicy = DecodePolicy::Strict;

/// ZAP API client for one company's scanner
pub struct ZapClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    api_key: String,
}

impl ZapClient {
    pub fn new(transport: Arc<dyn Transport>, setting: &ScannerSetting) -> Self {
        Self {
            transport,
            base_url: setting.base_url(),
            api_key: setting.api_key.clone(),
        }
    }

    fn generate_request(&self, title: &str, sites: &[String]) -> OutboundRequest {
        OutboundRequest::get(format!("{}{}", self.base_url, GENERATE_PATH))
            .header("X-ZAP-API-Key", self.api_key.as_str())
            .query("apikey", self.api_key.as_str())
            .query("title", title)
            .query("template", REPORT_TEMPLATE)
            .query("sites", sites.join("|"))
            .query("display", "true")
            .query("reportFileName", title)
    }
}

#[async_trait]
impl ReportBackend for ZapClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Zap
    }

    async fn generate_report(
        &self,
        title: &str,
        sites: &[String],
        cancel: &CancellationToken,
    ) -> Result<GeneratedReport> {
        debug!("Generating ZAP report '{}' for sites {:?}", title, sites);

        let request = self.generate_request(title, sites);
        let response = send_cancellable(self.transport.as_ref(), request, cancel).await?;
        debug!("ZAP response status {}, body: {}", response.status, response.body);

        if response.status != 200 {
            error!("ZAP API returned non-OK status: {}", response.status);
            return Err(ApiError::BackendRejected {
                status: response.status,
                body: response.body,
            }
            .into());
        }

        let decoded: GenerateResponse = response
            .decode(GENERATE_DECODE)?
            .ok_or_else(|| ApiError::Decode("empty generate response".to_string()))?;

        let artifact_path = decoded.generate.trim();
        if artifact_path.is_empty() {
            warn!("ZAP response decoded successfully, but 'generate' field is empty.");
            return Err(ApiError::EmptyArtifact.into());
        }

        info!("ZAP report generated successfully at: {}", artifact_path);
        Ok(GeneratedReport {
            artifact_path: artifact_path.to_string(),
            title: title.to_string(),
            sites: sites.to_vec(),
        })
    }
}
