//! Export summary and reporting
//!
//! This module defines the report handed back for every completed export.

use std::path::PathBuf;
use std::time::Duration;

/// Summary of one export request
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Name of the format that produced the file
    pub format: String,

    /// Display label of that format
    pub label: String,

    /// Human-readable description of the exported target
    pub target: String,

    /// File name to present to the end consumer
    pub display_name: String,

    /// Where the exported file now lives
    pub path: PathBuf,

    /// Whether the file is a copy the caller may delete
    pub deletable: bool,

    /// Number of artifacts the target expanded to
    pub members: usize,

    /// Number of referenced artifacts bundled under `Links`
    pub links_staged: usize,

    /// SHA-256 of the exported file, hex encoded
    pub sha256: String,

    /// Size of the exported file in bytes
    pub size_bytes: u64,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportReport {
    /// Size in a human-readable unit
    pub fn human_size(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
        let mut size = self.size_bytes as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} {}", self.size_bytes, UNITS[0])
        } else {
            format!("{:.1} {}", size, UNITS[unit])
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            format = %self.format,
            target = %self.target,
            file = %self.path.display(),
            members = self.members,
            links_staged = self.links_staged,
            size_bytes = self.size_bytes,
            sha256 = %self.sha256,
            deletable = self.deletable,
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(size_bytes: u64) -> ExportReport {
        ExportReport {
            format: "ZipExporter".to_string(),
            label: "Zip".to_string(),
            target: "artifact sim-001 (TimeSeries)".to_string(),
            display_name: "2024-03-01_10-15_TimeSeries.zip".to_string(),
            path: PathBuf::from("/tmp/2024-03-01_10-15_TimeSeries.zip"),
            deletable: true,
            members: 1,
            links_staged: 0,
            sha256: String::new(),
            size_bytes,
            duration: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_human_size() {
        assert_eq!(report(512).human_size(), "512 B");
        assert_eq!(report(2048).human_size(), "2.0 KiB");
        assert_eq!(report(5 * 1024 * 1024).human_size(), "5.0 MiB");
    }
}
