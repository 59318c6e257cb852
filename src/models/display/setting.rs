//! Scanner setting display model

use serde::Serialize;
use tabled::Tabled;

use crate::store::ScannerSetting;

/// Scanner connection row. The API key is masked.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SettingDisplay {
    #[tabled(rename = "SCANNER")]
    pub scanner: String,

    #[tabled(rename = "ENDPOINT")]
    pub endpoint: String,

    #[tabled(rename = "API KEY")]
    pub api_key: String,
}

impl From<ScannerSetting> for SettingDisplay {
    fn from(setting: ScannerSetting) -> Self {
        Self {
            scanner: setting.scanner.to_string(),
            endpoint: setting.base_url(),
            api_key: mask_key(&setting.api_key),
        }
    }
}

/// Keep the last four characters of a key
fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count == 0 {
        return "(not set)".to_string();
    }
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BackendKind;
    use uuid::Uuid;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(""), "(not set)");
        assert_eq!(mask_key("abc"), "****");
        assert_eq!(mask_key("secret-1234"), "****1234");
    }

    #[test]
    fn test_setting_display_never_shows_full_key() {
        let display = SettingDisplay::from(ScannerSetting {
            company_id: Uuid::nil(),
            scanner: BackendKind::Zap,
            scanner_url: "http://zap.internal".to_string(),
            scanner_port: 8080,
            api_key: "super-secret-key".to_string(),
        });

        assert_eq!(display.scanner, "ZAP");
        assert_eq!(display.endpoint, "http://zap.internal:8080");
        assert!(!display.api_key.contains("super"));
    }
}
