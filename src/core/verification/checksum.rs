//! Checksum calculation for data verification
//!
//! This module provides checksum calculation for exported files, so a consumer
//! can confirm the archive it received is the one that was produced.

use crate::domain::{Result, SatchelError};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Calculate SHA-256 checksum of raw bytes
///
/// # Returns
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use satchel::core::verification::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"Hello, World!");
/// assert_eq!(checksum.len(), 64); // SHA-256 produces 64 hex characters
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Checksum and size of a file on disk
///
/// The file is streamed, so large archives are never loaded whole.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn checksum_file(path: &Path) -> Result<(String, u64)> {
    let file = File::open(path).map_err(|e| {
        SatchelError::Io(format!("Failed to open {} for checksum: {}", path.display(), e))
    })?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    let mut size = 0u64;

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
        size += read as u64;
    }

    Ok((format!("{:x}", hasher.finalize()), size))
}
