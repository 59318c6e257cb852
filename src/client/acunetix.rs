//! Acunetix backend: cursor-paginated listings and report creation

use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info};
use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::models::{CreateReportRequest, CreateReportSource, ReportSet, ScanSet};
use super::pagination::{CursorWalker, DEFAULT_PAGE_SIZE};
use super::transport::{OutboundRequest, Transport, send_cancellable};
use super::{BackendKind, ReportBackend};
use crate::error::{ApiError, Result};
use crate::store::ScannerSetting;

/// Template used for every report scanvault asks Acunetix to create
pub const REPORT_TEMPLATE_ID: &str = "11111111-1111-1111-1111-111111111126";

const REPORTS_PATH: &str = "/api/v1/reports";
const SCANS_PATH: &str = "/api/v1/scans";

/// Acunetix API client for one company's scanner
pub struct AcunetixClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    api_key: String,
    page_size: usize,
}

impl AcunetixClient {
    pub fn new(transport: Arc<dyn Transport>, setting: &ScannerSetting) -> Self {
        Self {
            transport,
            base_url: setting.base_url(),
            api_key: setting.api_key.clone(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the number of items requested per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Directly fetchable link for a report; the list payload omits one.
    pub fn download_link(&self, report_id: &str) -> String {
        format!("{}{}/{}", self.base_url, REPORTS_PATH, report_id)
    }

    fn request(&self, method: Method, path: &str) -> OutboundRequest {
        OutboundRequest::new(method, format!("{}{}", self.base_url, path))
            .header("X-Auth", self.api_key.as_str())
            .header("Accept", "application/json")
    }

    fn page_request(&self, path: &str, cursor: Option<&str>) -> OutboundRequest {
        let request = self
            .request(Method::GET, path)
            .query("l", self.page_size.to_string());
        match cursor {
            Some(c) if !c.is_empty() => request.query("c", c),
            _ => request,
        }
    }

    /// Walk every scan on the scanner.
    pub async fn list_scans(&self, cancel: &CancellationToken) -> Result<ScanSet> {
        CursorWalker::new(self.transport.as_ref(), "scans")
            .walk(|cursor| self.page_request(SCANS_PATH, cursor), cancel)
            .await
    }
}

#[async_trait]
impl ReportBackend for AcunetixClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Acunetix
    }

    async fn list_reports(&self, cancel: &CancellationToken) -> Result<ReportSet> {
        let mut set: ReportSet = CursorWalker::new(self.transport.as_ref(), "reports")
            .walk(|cursor| self.page_request(REPORTS_PATH, cursor), cancel)
            .await?;

        for report in &mut set.items {
            report.download = vec![self.download_link(&report.report_id)];
        }

        Ok(set)
    }

    async fn create_report(&self, scan_ids: &[String], cancel: &CancellationToken) -> Result<()> {
        if scan_ids.is_empty() {
            return Err(ApiError::NoResolvedScans.into());
        }

        let body = CreateReportRequest {
            template_id: REPORT_TEMPLATE_ID,
            source: CreateReportSource {
                list_type: "scans",
                id_list: scan_ids,
            },
        };
        let request = self.request(Method::POST, REPORTS_PATH).json(&body)?;

        let response = send_cancellable(self.transport.as_ref(), request, cancel).await?;
        if response.status != 201 {
            error!("Response Body: {}", response.body);
            return Err(ApiError::BackendRejected {
                status: response.status,
                body: response.body,
            }
            .into());
        }

        info!("Report has been created for {} scans", scan_ids.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::ScriptedTransport;
    use crate::client::transport::RawResponse;
    use crate::error::Error;
    use uuid::Uuid;

    fn setting() -> ScannerSetting {
        ScannerSetting {
            company_id: Uuid::nil(),
            scanner: BackendKind::Acunetix,
            scanner_url: "https://scanner.example".to_string(),
            scanner_port: 3443,
            api_key: "acx-key".to_string(),
        }
    }

    #[test]
    fn test_download_link_synthesis() {
        let client = AcunetixClient::new(Arc::new(ScriptedTransport::default()), &setting());
        assert_eq!(
            client.download_link("R1"),
            "https://scanner.example:3443/api/v1/reports/R1"
        );
    }

    #[tokio::test]
    async fn test_list_reports_walks_pages_and_rewrites_links() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            RawResponse::new(
                200,
                r#"{"reports": [{"report_id": "R1", "download": ["/x/R1.pdf"]}],
                    "pagination": {"cursors": ["", "R1"]}}"#,
            ),
            RawResponse::new(
                200,
                r#"{"reports": [{"report_id": "R2", "download": []}],
                    "pagination": {"cursors": ["R1", ""]}}"#,
            ),
        ]));
        let client = AcunetixClient::new(transport.clone(), &setting()).with_page_size(1);

        let set = client.list_reports(&CancellationToken::new()).await.unwrap();

        assert!(set.complete);
        assert_eq!(set.items.len(), 2);
        assert_eq!(
            set.items[0].download,
            vec!["https://scanner.example:3443/api/v1/reports/R1"]
        );
        assert_eq!(
            set.items[1].download,
            vec!["https://scanner.example:3443/api/v1/reports/R2"]
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0].url,
            "https://scanner.example:3443/api/v1/reports"
        );
        assert_eq!(requests[0].query_value("l"), Some("1"));
        assert_eq!(requests[0].header_value("X-Auth"), Some("acx-key"));
        assert_eq!(requests[1].query_value("c"), Some("R1"));
    }

    #[tokio::test]
    async fn test_list_scans_uses_scans_endpoint() {
        let transport = Arc::new(ScriptedTransport::new(vec![RawResponse::new(
            200,
            r#"{"scans": [{"scan_id": "S1", "target": {"address": "http://a.example"}}],
                "pagination": {"cursors": [""]}}"#,
        )]));
        let client = AcunetixClient::new(transport.clone(), &setting());

        let set = client.list_scans(&CancellationToken::new()).await.unwrap();

        assert_eq!(set.items[0].scan_id, "S1");
        assert!(transport.requests()[0].url.ends_with("/api/v1/scans"));
        assert_eq!(transport.requests()[0].query_value("l"), Some("99"));
    }

    #[tokio::test]
    async fn test_create_report_posts_template_and_ids() {
        let transport = Arc::new(ScriptedTransport::new(vec![RawResponse::new(201, "")]));
        let client = AcunetixClient::new(transport.clone(), &setting());

        client
            .create_report(
                &["S1".to_string(), "S2".to_string()],
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["template_id"], REPORT_TEMPLATE_ID);
        assert_eq!(body["source"]["list_type"], "scans");
        assert_eq!(body["source"]["id_list"], serde_json::json!(["S1", "S2"]));
    }

    #[tokio::test]
    async fn test_create_report_non_201_is_rejected() {
        let transport = Arc::new(ScriptedTransport::new(vec![RawResponse::new(
            200,
            r#"{"message": "accepted?"}"#,
        )]));
        let client = AcunetixClient::new(transport, &setting());

        let err = client
            .create_report(&["S1".to_string()], &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Api(ApiError::BackendRejected { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn test_create_report_without_scans_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::default());
        let client = AcunetixClient::new(transport.clone(), &setting());

        let err = client
            .create_report(&[], &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api(ApiError::NoResolvedScans)));
        assert!(transport.requests().is_empty());
    }
}
