//! Artifact, group and export target models

use crate::domain::ids::{Gid, GroupId, OperationId, ProjectName, TypeTag};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable stored data unit
///
/// Every artifact is produced by exactly one operation; the operation owns the
/// folder that holds the artifact's backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Globally unique identifier
    pub gid: Gid,

    /// Type tag shared by every member of a group
    pub type_tag: TypeTag,

    /// Operation that produced the artifact
    pub operation: OperationId,

    /// Project the operation belongs to
    pub project: ProjectName,

    /// Group the artifact is a member of, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
}

impl Artifact {
    /// Create an artifact that is not part of a group
    pub fn new(gid: Gid, type_tag: TypeTag, operation: OperationId, project: ProjectName) -> Self {
        Self {
            gid,
            type_tag,
            operation,
            project,
            group: None,
        }
    }

    /// Attach the artifact to a group
    pub fn in_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Lightweight summary as returned by group membership queries
    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            gid: self.gid.clone(),
            operation: self.operation.clone(),
        }
    }
}

/// Member entry of a group listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub gid: Gid,
    pub operation: OperationId,
}

/// A named, type-homogeneous collection of artifacts
///
/// Membership is not stored here; it is resolved through the artifact locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactGroup {
    pub id: GroupId,
    pub project: ProjectName,
}

impl ArtifactGroup {
    pub fn new(id: GroupId, project: ProjectName) -> Self {
        Self { id, project }
    }
}

/// Project context of an export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: ProjectName,
}

impl Project {
    pub fn new(name: ProjectName) -> Self {
        Self { name }
    }
}

/// The unit an export request is made for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// A single artifact
    Artifact(Artifact),

    /// Every member of an artifact group
    Group(ArtifactGroup),
}

impl ExportTarget {
    /// Whether the target is an artifact group
    pub fn is_group(&self) -> bool {
        matches!(self, ExportTarget::Group(_))
    }

    /// Project the target lives in
    pub fn project(&self) -> Project {
        match self {
            ExportTarget::Artifact(artifact) => Project::new(artifact.project.clone()),
            ExportTarget::Group(group) => Project::new(group.project.clone()),
        }
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportTarget::Artifact(artifact) => {
                write!(f, "artifact {} ({})", artifact.gid, artifact.type_tag)
            }
            ExportTarget::Group(group) => write!(f, "group {}", group.id),
        }
    }
}

impl From<Artifact> for ExportTarget {
    fn from(artifact: Artifact) -> Self {
        ExportTarget::Artifact(artifact)
    }
}

impl From<ArtifactGroup> for ExportTarget {
    fn from(group: ArtifactGroup) -> Self {
        ExportTarget::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> Artifact {
        Artifact::new(
            Gid::new("sim-001").unwrap(),
            TypeTag::new("TimeSeries").unwrap(),
            OperationId::new("12").unwrap(),
            ProjectName::new("default").unwrap(),
        )
    }

    #[test]
    fn test_summary_keeps_gid_and_operation() {
        let summary = artifact().summary();
        assert_eq!(summary.gid.as_str(), "sim-001");
        assert_eq!(summary.operation.as_str(), "12");
    }

    #[test]
    fn test_target_project() {
        let target = ExportTarget::from(artifact());
        assert!(!target.is_group());
        assert_eq!(target.project().name.as_str(), "default");

        let group = ArtifactGroup::new(
            GroupId::new("grp-42").unwrap(),
            ProjectName::new("sweeps").unwrap(),
        );
        let target = ExportTarget::from(group);
        assert!(target.is_group());
        assert_eq!(target.project().name.as_str(), "sweeps");
    }

    #[test]
    fn test_target_display() {
        let target = ExportTarget::from(artifact());
        assert_eq!(target.to_string(), "artifact sim-001 (TimeSeries)");
    }
}
