//! Translation from caller-supplied targets to Acunetix scan ids

use std::collections::HashMap;

use log::info;
use serde::Serialize;

use crate::client::ScanDescriptor;

/// Target address to scan id, built once per orchestration run.
///
/// The map is a plain value handed from the scan listing to [`resolve`]; it
/// is never shared between runs.
#[derive(Debug, Clone, Default)]
pub struct ScanIdMap {
    by_target: HashMap<String, String>,
}

impl ScanIdMap {
    /// Index scans by target address. The first scan listed for an address wins.
    pub fn from_scans<'a>(scans: impl IntoIterator<Item = &'a ScanDescriptor>) -> Self {
        let mut map = Self::default();
        for scan in scans {
            map.insert(&scan.target.address, &scan.scan_id);
        }
        map
    }

    /// Add a mapping unless the target is already known.
    pub fn insert(&mut self, target: &str, scan_id: &str) {
        self.by_target
            .entry(target.to_string())
            .or_insert_with(|| scan_id.to_string());
    }

    pub fn get(&self, target: &str) -> Option<&str> {
        self.by_target.get(target).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}

/// Outcome of resolving targets: the ids found and the targets skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub scan_ids: Vec<String>,
    pub skipped: Vec<String>,
}

/// Resolve each target to its scan id, skipping unknown targets.
///
/// Never fails: callers may mix known and unknown targets.
pub fn resolve(targets: &[String], map: &ScanIdMap) -> Resolution {
    let mut resolution = Resolution::default();
    if map.is_empty() {
        info!("No scans indexed; all {} targets will be skipped", targets.len());
    }

    for target in targets {
        match map.get(target) {
            Some(scan_id) => resolution.scan_ids.push(scan_id.to_string()),
            None => {
                info!("Scan URL {} not found in map", target);
                resolution.skipped.push(target.clone());
            }
        }
    }

    resolution
}
