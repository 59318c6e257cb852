//! Report display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{format_datetime, or_dash, truncate_string};
use crate::client::ReportDescriptor;
use crate::store::PersistedReport;

/// Remote Acunetix report row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RemoteReportDisplay {
    #[tabled(rename = "REPORT ID")]
    pub id: String,

    #[tabled(rename = "TEMPLATE")]
    pub template: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    /// What the report covers, e.g. "scans: 3"
    #[tabled(rename = "SOURCE")]
    pub source: String,

    #[tabled(rename = "GENERATED")]
    pub generated: String,

    #[tabled(rename = "DOWNLOAD")]
    pub download: String,
}

impl From<ReportDescriptor> for RemoteReportDisplay {
    fn from(report: ReportDescriptor) -> Self {
        let source = match &report.source.description {
            Some(desc) if !desc.is_empty() => truncate_string(desc, 40),
            _ if report.source.list_type.is_empty() => "--".to_string(),
            _ => format!(
                "{}: {}",
                report.source.list_type,
                report.source.id_list.len()
            ),
        };

        Self {
            template: or_dash(&report.template_name),
            status: or_dash(&report.status),
            generated: format_datetime(report.generation_date.as_ref()),
            download: report
                .download
                .first()
                .cloned()
                .unwrap_or_else(|| "--".to_string()),
            source,
            id: report.report_id,
        }
    }
}

/// Catalog row as stored locally
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CatalogDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "TYPE")]
    pub report_type: String,

    #[tabled(rename = "LINK")]
    pub download_link: String,

    #[tabled(rename = "CREATED")]
    pub created_at: String,
}

impl From<PersistedReport> for CatalogDisplay {
    fn from(report: PersistedReport) -> Self {
        Self {
            id: report.id.to_string(),
            name: report.name,
            report_type: report.report_type.to_string(),
            download_link: report.download_link,
            created_at: format_datetime(Some(&report.created_at)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BackendKind;
    use crate::client::models::ReportSource;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn descriptor() -> ReportDescriptor {
        ReportDescriptor {
            report_id: "R1".to_string(),
            generation_date: None,
            status: "completed".to_string(),
            template_id: "t".to_string(),
            template_name: "Developer".to_string(),
            template_type: 0,
            source: ReportSource {
                list_type: "scans".to_string(),
                description: None,
                id_list: vec!["S1".to_string(), "S2".to_string()],
            },
            download: vec!["https://scanner.example/api/v1/reports/R1".to_string()],
        }
    }

    #[test]
    fn test_remote_report_display() {
        let display = RemoteReportDisplay::from(descriptor());

        assert_eq!(display.id, "R1");
        assert_eq!(display.template, "Developer");
        assert_eq!(display.source, "scans: 2");
        assert_eq!(display.generated, "--");
        assert_eq!(
            display.download,
            "https://scanner.example/api/v1/reports/R1"
        );
    }

    #[test]
    fn test_remote_report_display_prefers_description() {
        let mut report = descriptor();
        report.source.description = Some("http://a.example;http://b.example".to_string());
        report.download.clear();

        let display = RemoteReportDisplay::from(report);
        assert_eq!(display.source, "http://a.example;http://b.example");
        assert_eq!(display.download, "--");
    }

    #[test]
    fn test_catalog_display() {
        let id = Uuid::new_v4();
        let display = CatalogDisplay::from(PersistedReport {
            id,
            name: "weekly".to_string(),
            company_id: Uuid::new_v4(),
            download_link: "/tmp/r.html".to_string(),
            report_type: BackendKind::Zap,
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap(),
        });

        assert_eq!(display.id, id.to_string());
        assert_eq!(display.report_type, "ZAP");
        assert_eq!(display.created_at, "2024-05-02T08:00:00Z");
    }
}
