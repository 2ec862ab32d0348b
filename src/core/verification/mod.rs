//! Verification of produced export files
//!
//! This module provides checksums for exported files and read-back inspection
//! of built archives.

pub mod checksum;
pub mod verify;

pub use checksum::{calculate_checksum_bytes, checksum_file};
pub use verify::{inspect_archive, verify_checksum, ArchiveListing};
