//! JSON output formatting

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T> {
    pub data: T,
    pub meta: Metadata,
}

/// When the output was produced and by which scanvault build
#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    pub timestamp: String,
    pub version: String,
}

impl<T> JsonOutput<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    let output = JsonOutput::new(data);
    serde_json::to_string_pretty(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Clone)]
    struct CatalogRow {
        name: String,
        download_link: String,
    }

    #[test]
    fn test_json_output_new() {
        let output = JsonOutput::new(vec!["R1", "R2"]);

        assert_eq!(output.data, vec!["R1", "R2"]);
        assert_eq!(output.meta.version, env!("CARGO_PKG_VERSION"));
        assert!(!output.meta.timestamp.is_empty());
    }

    #[test]
    fn test_format_json_wraps_rows() {
        let rows = vec![CatalogRow {
            name: "weekly".to_string(),
            download_link: "/tmp/r.html".to_string(),
        }];

        let result = format_json(&rows).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();

        assert_eq!(value["data"][0]["name"], "weekly");
        assert_eq!(value["data"][0]["download_link"], "/tmp/r.html");
        assert!(value["meta"]["timestamp"].is_string());
    }

    #[test]
    fn test_format_json_empty_vec() {
        let rows: Vec<CatalogRow> = vec![];
        let result = format_json(&rows).unwrap();

        assert!(result.contains("\"data\": []"));
    }
}
