//! Read-back verification of produced archives

use super::checksum::checksum_file;
use crate::domain::{Result, SatchelError};
use std::fs::File;
use std::path::Path;

/// What an archive on disk contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveListing {
    /// Entry names in archive order
    pub entries: Vec<String>,

    /// SHA-256 of the archive file
    pub sha256: String,

    /// Size of the archive file in bytes
    pub size_bytes: u64,
}

impl ArchiveListing {
    /// Distinct top-level folders, in first-seen order
    pub fn top_level_folders(&self) -> Vec<&str> {
        let mut folders: Vec<&str> = Vec::new();
        for entry in &self.entries {
            let folder = entry.split('/').next().unwrap_or(entry);
            if !folders.contains(&folder) {
                folders.push(folder);
            }
        }
        folders
    }
}

/// Open `path` as a zip archive and list it
///
/// # Errors
///
/// Returns an error if the file is missing or not a readable zip archive.
pub fn inspect_archive(path: &Path) -> Result<ArchiveListing> {
    let file = File::open(path)
        .map_err(|e| SatchelError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| {
        SatchelError::Validation(format!("{} is not a valid archive: {}", path.display(), e))
    })?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| SatchelError::Validation(format!("Corrupt archive entry {index}: {e}")))?;
        entries.push(entry.name().to_string());
    }

    let (sha256, size_bytes) = checksum_file(path)?;
    Ok(ArchiveListing {
        entries,
        sha256,
        size_bytes,
    })
}

/// Check that the file at `path` still has the expected checksum
///
/// # Errors
///
/// Returns a validation error on mismatch, or an I/O error if the file cannot
/// be read.
pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    let (actual, _) = checksum_file(path)?;
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(SatchelError::Validation(format!(
            "Checksum mismatch for {}: expected {}, found {}",
            path.display(),
            expected,
            actual
        )));
    }
    Ok(())
}
