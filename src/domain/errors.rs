//! Domain error types
//!
//! This module defines the error hierarchy for Satchel. Export failures of
//! every kind surface as [`ExportError`]; locator failures as [`StoreError`];
//! both fold into the top-level [`SatchelError`].

use std::path::PathBuf;
use thiserror::Error;

/// Main Satchel error type
#[derive(Debug, Error)]
pub enum SatchelError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Artifact store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while exporting a target
///
/// None of these are retried; the caller decides whether to re-issue the
/// whole request.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The target resolved to zero artifacts; raised before any I/O
    #[error("Nothing to export: {0}")]
    EmptyExportTarget(String),

    /// A referenced GID could not be loaded or located
    #[error("Could not resolve reference '{label}' to {gid}: {message}")]
    ReferenceResolution {
        label: String,
        gid: String,
        message: String,
    },

    /// A member or its operation folder could not be looked up
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Copying into the export workspace failed
    #[error("Staging failed for {}: {message}", path.display())]
    StagingIo { path: PathBuf, message: String },

    /// The archive could not be written
    #[error("Archive build failed for {}: {message}", path.display())]
    ArchiveBuild { path: PathBuf, message: String },

    /// The requested format does not accept the target
    #[error("Export format {format} does not accept {target}")]
    Unsupported { format: String, target: String },
}

impl ExportError {
    pub(crate) fn staging(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ExportError::StagingIo {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ExportError::ArchiveBuild {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Artifact store errors
///
/// Raised by locator implementations. These don't expose third-party types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No artifact with this GID is indexed
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    /// No artifact declares membership of this group
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// A backing file could not be parsed
    #[error("Invalid artifact document {}: {message}", path.display())]
    InvalidDocument { path: PathBuf, message: String },

    /// Two backing files claim the same GID
    #[error("Duplicate GID {gid} in {} and {}", first.display(), second.display())]
    DuplicateGid {
        gid: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Members of one group carry different type tags
    #[error("Group {group} mixes type {found} ({gid}) with {expected}")]
    MixedGroup {
        group: String,
        expected: String,
        found: String,
        gid: String,
    },

    /// Filesystem failure while reading the store
    #[error("Store I/O error: {0}")]
    Io(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for SatchelError {
    fn from(err: std::io::Error) -> Self {
        SatchelError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SatchelError {
    fn from(err: serde_json::Error) -> Self {
        SatchelError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SatchelError {
    fn from(err: toml::de::Error) -> Self {
        SatchelError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satchel_error_display() {
        let err = SatchelError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_export_error_conversion() {
        let export_err = ExportError::EmptyExportTarget("group grp-42".to_string());
        let err: SatchelError = export_err.into();
        assert!(matches!(err, SatchelError::Export(_)));
        assert_eq!(err.to_string(), "Export error: Nothing to export: group grp-42");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::ArtifactNotFound("sim-404".to_string());
        let err: SatchelError = store_err.into();
        assert!(matches!(err, SatchelError::Store(_)));
    }

    #[test]
    fn test_reference_resolution_message() {
        let err = ExportError::ReferenceResolution {
            label: "connectivity".to_string(),
            gid: "conn-7".to_string(),
            message: "Artifact not found: conn-7".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not resolve reference 'connectivity' to conn-7: Artifact not found: conn-7"
        );
    }

    #[test]
    fn test_staging_helper_keeps_path() {
        let err = ExportError::staging("/tmp/ws/12", "permission denied");
        match err {
            ExportError::StagingIo { path, message } => {
                assert_eq!(path, PathBuf::from("/tmp/ws/12"));
                assert_eq!(message, "permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SatchelError = io_err.into();
        assert!(matches!(err, SatchelError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: SatchelError = toml_err.into();
        assert!(matches!(err, SatchelError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &SatchelError::Validation("x".to_string());
        let _: &dyn std::error::Error = &ExportError::Lookup("x".to_string());
        let _: &dyn std::error::Error = &StoreError::Io("x".to_string());
    }
}
