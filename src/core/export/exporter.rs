//! Exporter contract
//!
//! Every export format implements [`Exporter`]. The trait supplies the shared
//! behaviour (acceptance, effective type resolution, file naming) on top of a
//! handful of per-format methods.

use crate::adapters::locator::{ArtifactLocator, StructuredFileReader};
use crate::domain::{Artifact, ExportError, ExportTarget, Project, TypeTag};
use chrono::{Local, NaiveDateTime};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Prefix of every top-level folder inside an archive
pub const OPERATION_FOLDER_PREFIX: &str = "Operation_";

/// Workspace folder holding transitively referenced artifacts
pub const LINKS_FOLDER: &str = "Links";

/// Timestamp layout used in export file names
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

/// Type tags that no format may export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(BTreeSet<TypeTag>);

impl ExclusionSet {
    pub fn new(tags: impl IntoIterator<Item = TypeTag>) -> Self {
        Self(tags.into_iter().collect())
    }

    /// Build from configured tag names
    ///
    /// # Errors
    ///
    /// Returns an error naming the first empty tag.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        names
            .iter()
            .map(|name| TypeTag::new(name.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Type tags an export format handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportedTypes {
    /// Every type tag
    All,
    /// Only the listed type tags
    Only(BTreeSet<TypeTag>),
}

impl SupportedTypes {
    pub fn only(tags: impl IntoIterator<Item = TypeTag>) -> Self {
        SupportedTypes::Only(tags.into_iter().collect())
    }

    /// Build from configured tag names, where `"*"` means [`SupportedTypes::All`]
    ///
    /// # Errors
    ///
    /// Returns an error naming the first empty tag.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        if names
            .iter()
            .any(|name| name.as_ref() == crate::config::ALL_TYPES)
        {
            return Ok(SupportedTypes::All);
        }
        names
            .iter()
            .map(|name| TypeTag::new(name.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(SupportedTypes::Only)
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        match self {
            SupportedTypes::All => true,
            SupportedTypes::Only(tags) => tags.contains(tag),
        }
    }

    /// Whether no type tag is supported
    pub fn is_empty(&self) -> bool {
        matches!(self, SupportedTypes::Only(tags) if tags.is_empty())
    }
}

impl fmt::Display for SupportedTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupportedTypes::All => write!(f, "all types"),
            SupportedTypes::Only(tags) => {
                let names: Vec<&str> = tags.iter().map(TypeTag::as_str).collect();
                write!(f, "{}", names.join(", "))
            }
        }
    }
}

/// Collaborators shared by every format of one deployment
#[derive(Clone)]
pub struct ExportContext {
    locator: Arc<dyn ArtifactLocator>,
    reader: Arc<dyn StructuredFileReader>,
    exclusions: ExclusionSet,
}

impl ExportContext {
    pub fn new(
        locator: Arc<dyn ArtifactLocator>,
        reader: Arc<dyn StructuredFileReader>,
        exclusions: ExclusionSet,
    ) -> Self {
        Self {
            locator,
            reader,
            exclusions,
        }
    }

    pub fn locator(&self) -> &dyn ArtifactLocator {
        self.locator.as_ref()
    }

    pub fn reader(&self) -> &dyn StructuredFileReader {
        self.reader.as_ref()
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }
}

impl fmt::Debug for ExportContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportContext")
            .field("exclusions", &self.exclusions)
            .finish_non_exhaustive()
    }
}

/// Result of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// File name to present to the end consumer
    pub display_name: String,

    /// Full path of the produced (or served) file
    pub path: PathBuf,

    /// Whether the caller may delete the file once it has been served
    pub deletable: bool,

    /// Number of artifacts the export covers
    pub members: usize,
}

/// An export format
pub trait Exporter: Send + Sync {
    /// Name of the format
    fn name(&self) -> &'static str;

    /// Display label, the format name unless overridden
    fn label(&self) -> String {
        self.name().to_string()
    }

    /// Type tags the format can export
    fn supported_types(&self) -> &SupportedTypes;

    /// Shared collaborators
    fn context(&self) -> &ExportContext;

    /// Formats that only deal with single artifacts return `true`
    fn skips_group_exports(&self) -> bool {
        false
    }

    /// Extension of the exported file, without the dot
    fn export_file_extension(&self, artifact: &Artifact) -> String;

    /// Export `target`, staging into `export_folder`
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if the target is empty, a reference cannot be
    /// resolved, or staging or archiving fails.
    fn export(
        &self,
        target: &ExportTarget,
        export_folder: &Path,
        project: &Project,
    ) -> Result<ExportOutcome, ExportError>;

    /// Whether this format can export `target`
    ///
    /// Never fails: anything that cannot be determined counts as `false`.
    fn accepts(&self, target: &ExportTarget) -> bool {
        let Some(effective) = self.resolve_effective_type(target) else {
            tracing::debug!(format = self.name(), target = %target, "No effective artifact");
            return false;
        };

        if self.context().exclusions().contains(&effective.type_tag) {
            tracing::debug!(
                format = self.name(),
                type_tag = %effective.type_tag,
                "Type tag is globally excluded from export"
            );
            return false;
        }

        self.supported_types().contains(&effective.type_tag)
    }

    /// Representative artifact used for type checks
    ///
    /// Groups are homogeneous, so their first member stands for all of them.
    fn resolve_effective_type(&self, target: &ExportTarget) -> Option<Artifact> {
        let group = match target {
            ExportTarget::Artifact(artifact) => return Some(artifact.clone()),
            ExportTarget::Group(group) => group,
        };

        if self.skips_group_exports() {
            return None;
        }

        let locator = self.context().locator();
        let members = match locator.members_of_group(&group.id) {
            Ok(members) => members,
            Err(e) => {
                tracing::debug!(group_id = %group.id, error = %e, "Could not list group members");
                return None;
            }
        };

        let first = members.first()?;
        match locator.load_by_gid(&first.gid) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                tracing::debug!(gid = %first.gid, error = %e, "Could not load group member");
                None
            }
        }
    }

    /// Output file name stamped with the local time
    fn export_file_name(&self, artifact: &Artifact) -> String {
        self.export_file_name_at(artifact, Local::now().naive_local())
    }

    /// Output file name stamped with `at`: `<%Y-%m-%d_%H-%M>_<type>.<ext>`
    fn export_file_name_at(&self, artifact: &Artifact, at: NaiveDateTime) -> String {
        format!(
            "{}_{}.{}",
            at.format(EXPORT_TIMESTAMP_FORMAT),
            artifact.type_tag,
            self.export_file_extension(artifact)
        )
    }
}
