//! Locator and reader traits
//!
//! The export core only talks to storage through these traits, so any
//! artifact store can be plugged in as long as it can answer the lookups below.

use crate::domain::{
    Artifact, ArtifactGroup, ArtifactSummary, Gid, GroupId, OperationId, ProjectName, Reference,
    Result,
};
use std::path::{Path, PathBuf};

/// Artifact lookup by identifier
///
/// This trait defines the interface every artifact store must implement to be
/// exported from.
pub trait ArtifactLocator: Send + Sync {
    /// Path of the artifact's backing file
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact is not known to the store.
    fn path_for_stored_artifact(&self, artifact: &Artifact) -> Result<PathBuf>;

    /// Members of a group, in store order
    ///
    /// A known group without members yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the group is unknown.
    fn members_of_group(&self, group_id: &GroupId) -> Result<Vec<ArtifactSummary>>;

    /// Load an artifact by GID
    ///
    /// # Errors
    ///
    /// Returns an error if no artifact carries this GID.
    fn load_by_gid(&self, gid: &Gid) -> Result<Artifact>;

    /// Folder owned by an operation of a project
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be derived.
    fn operation_folder(&self, project: &ProjectName, operation: &OperationId) -> Result<PathBuf>;

    /// Look up a group by id
    ///
    /// # Errors
    ///
    /// Returns an error if the group is unknown.
    fn find_group(&self, group_id: &GroupId) -> Result<ArtifactGroup>;
}

/// Opens backing files for reading their embedded structure
pub trait StructuredFileReader: Send + Sync {
    /// Open a backing file in read-only mode
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid document.
    fn open_read_only(&self, path: &Path) -> Result<Box<dyn StructuredFile>>;
}

/// An opened backing file
pub trait StructuredFile {
    /// Every reference slot embedded in the file, filled or not
    ///
    /// # Errors
    ///
    /// Returns an error if the reference section is malformed.
    fn gather_references(&self) -> Result<Vec<Reference>>;
}
