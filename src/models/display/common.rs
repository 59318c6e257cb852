//! Common display utilities and helpers

use chrono::{DateTime, Utc};

/// Truncate string to max length with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// ISO datetime (YYYY-MM-DDTHH:MM:SSZ), or `--` when absent
pub fn format_datetime(dt: Option<&DateTime<Utc>>) -> String {
    match dt {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        None => "--".to_string(),
    }
}

/// Empty strings render as `--`
pub fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "--".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a very long target name", 10), "a very ...");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(format_datetime(Some(&dt)), "2024-03-01T12:30:00Z");
        assert_eq!(format_datetime(None), "--");
    }
}
