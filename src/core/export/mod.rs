//! Export archival
//!
//! This module provides the export path for Satchel:
//! - The [`Exporter`] contract and its concrete formats
//! - Group expansion and staging of operation folders
//! - Reference graph walking into the `Links` folder
//! - Deterministic archive building
//! - Request coordination and reporting

pub mod archive;
pub mod coordinator;
pub mod exporter;
pub mod formats;
pub mod group;
pub mod staging;
pub mod summary;
pub mod walker;

pub use archive::ArchiveBuilder;
pub use coordinator::{ExportCoordinator, TargetRef};
pub use exporter::{
    ExclusionSet, ExportContext, ExportOutcome, Exporter, SupportedTypes, EXPORT_TIMESTAMP_FORMAT,
    LINKS_FOLDER, OPERATION_FOLDER_PREFIX,
};
pub use formats::{ExporterRegistry, LinkedZipExporter, NativeFileExporter, ZipExporter};
pub use group::{expand_target, export_members, group_export};
pub use staging::StagingCoordinator;
pub use summary::ExportReport;
pub use walker::{LinksFolder, ReferenceWalker, StagedLink};
