//! Filesystem-backed artifact store
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   <project>/
//!     groups.json            optional list of declared group ids
//!     <operation_id>/
//!       <name>.json          artifact backing file (see `ArtifactDocument`)
//!       ...                  any other operation output, copied as-is
//! ```
//!
//! JSON files without a `gid`/`type` header are operation output and are not
//! indexed. All members of a group must share one type tag.
//!
//! The tree is indexed once when the store is opened. Artifacts are immutable,
//! so the index never goes stale for artifacts it already knows about.

use super::document::ArtifactDocument;
use crate::adapters::locator::ArtifactLocator;
use crate::domain::{
    Artifact, ArtifactGroup, ArtifactSummary, Gid, GroupId, OperationId, ProjectName, Result,
    StoreError,
};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the optional per-project group manifest
pub const GROUPS_MANIFEST: &str = "groups.json";

#[derive(Debug, Clone)]
struct IndexedArtifact {
    artifact: Artifact,
    path: PathBuf,
}

#[derive(Debug, Clone)]
struct GroupEntry {
    project: ProjectName,
    members: Vec<Gid>,
}

/// Artifact store rooted at a directory
#[derive(Debug)]
pub struct FilesystemStore {
    root: PathBuf,
    artifacts: HashMap<Gid, IndexedArtifact>,
    groups: BTreeMap<GroupId, GroupEntry>,
}

impl FilesystemStore {
    /// Open and index the store at `root`
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing, a backing file is not a valid
    /// document, two files claim the same GID, or a group mixes type tags.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(StoreError::Io(format!(
                "Store root is not a directory: {}",
                root.display()
            ))
            .into());
        }

        let mut store = Self {
            root,
            artifacts: HashMap::new(),
            groups: BTreeMap::new(),
        };
        store.index()?;

        tracing::info!(
            root = %store.root.display(),
            artifacts = store.artifacts.len(),
            groups = store.groups.len(),
            "Indexed artifact store"
        );

        Ok(store)
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of indexed artifacts
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the store holds no artifacts
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    fn index(&mut self) -> Result<()> {
        for project_dir in sorted_subdirs(&self.root)? {
            let project = dir_identifier::<ProjectName>(&project_dir)?;

            for group_id in read_groups_manifest(&project_dir)? {
                self.groups.entry(group_id).or_insert_with(|| GroupEntry {
                    project: project.clone(),
                    members: Vec::new(),
                });
            }

            for operation_dir in sorted_subdirs(&project_dir)? {
                let operation = dir_identifier::<OperationId>(&operation_dir)?;
                self.index_operation(&project, &operation, &operation_dir)?;
            }
        }

        for (group_id, entry) in self.groups.iter_mut() {
            let artifacts = &self.artifacts;
            entry.members.sort_by(|a, b| {
                let op_a = &artifacts[a].artifact.operation;
                let op_b = &artifacts[b].artifact.operation;
                op_a.cmp(op_b).then_with(|| a.cmp(b))
            });
            check_homogeneous(group_id, &entry.members, artifacts)?;
        }

        Ok(())
    }

    fn index_operation(
        &mut self,
        project: &ProjectName,
        operation: &OperationId,
        operation_dir: &Path,
    ) -> Result<()> {
        let walker = WalkDir::new(operation_dir).sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| StoreError::Io(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json")
            {
                continue;
            }

            let Some(document) = ArtifactDocument::read_if_artifact(path)? else {
                tracing::trace!(path = %path.display(), "Skipping non-artifact JSON");
                continue;
            };
            let mut artifact = Artifact::new(
                document.gid.clone(),
                document.type_tag.clone(),
                operation.clone(),
                project.clone(),
            );
            if let Some(group) = document.group.clone() {
                artifact = artifact.in_group(group.clone());
                self.groups
                    .entry(group)
                    .or_insert_with(|| GroupEntry {
                        project: project.clone(),
                        members: Vec::new(),
                    })
                    .members
                    .push(document.gid.clone());
            }

            if let Some(existing) = self.artifacts.get(&document.gid) {
                return Err(StoreError::DuplicateGid {
                    gid: document.gid.to_string(),
                    first: existing.path.clone(),
                    second: path.to_path_buf(),
                }
                .into());
            }

            tracing::trace!(gid = %document.gid, path = %path.display(), "Indexed artifact");
            self.artifacts.insert(
                document.gid,
                IndexedArtifact {
                    artifact,
                    path: path.to_path_buf(),
                },
            );
        }
        Ok(())
    }

    fn entry(&self, gid: &Gid) -> Result<&IndexedArtifact> {
        self.artifacts
            .get(gid)
            .ok_or_else(|| StoreError::ArtifactNotFound(gid.to_string()).into())
    }
}

impl ArtifactLocator for FilesystemStore {
    fn path_for_stored_artifact(&self, artifact: &Artifact) -> Result<PathBuf> {
        Ok(self.entry(&artifact.gid)?.path.clone())
    }

    fn members_of_group(&self, group_id: &GroupId) -> Result<Vec<ArtifactSummary>> {
        let group = self
            .groups
            .get(group_id)
            .ok_or_else(|| StoreError::GroupNotFound(group_id.to_string()))?;

        group
            .members
            .iter()
            .map(|gid| Ok(self.entry(gid)?.artifact.summary()))
            .collect()
    }

    fn load_by_gid(&self, gid: &Gid) -> Result<Artifact> {
        Ok(self.entry(gid)?.artifact.clone())
    }

    fn operation_folder(&self, project: &ProjectName, operation: &OperationId) -> Result<PathBuf> {
        Ok(self.root.join(project.as_str()).join(operation.as_str()))
    }

    fn find_group(&self, group_id: &GroupId) -> Result<ArtifactGroup> {
        self.groups
            .get(group_id)
            .map(|entry| ArtifactGroup::new(group_id.clone(), entry.project.clone()))
            .ok_or_else(|| StoreError::GroupNotFound(group_id.to_string()).into())
    }
}

fn check_homogeneous(
    group_id: &GroupId,
    members: &[Gid],
    artifacts: &HashMap<Gid, IndexedArtifact>,
) -> Result<()> {
    let Some((first, rest)) = members.split_first() else {
        return Ok(());
    };
    let expected = &artifacts[first].artifact.type_tag;
    for gid in rest {
        let found = &artifacts[gid].artifact.type_tag;
        if found != expected {
            return Err(StoreError::MixedGroup {
                group: group_id.to_string(),
                expected: expected.to_string(),
                found: found.to_string(),
                gid: gid.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Visible subdirectories of `dir`, sorted by name
fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| StoreError::Io(format!("Failed to list {}: {}", dir.display(), e)))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::Io(e.to_string()))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if path.is_dir() && !hidden {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_identifier<T>(dir: &Path) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.parse::<T>()
        .map_err(|e| StoreError::Io(format!("{}: {}", dir.display(), e)).into())
}

fn read_groups_manifest(project_dir: &Path) -> Result<Vec<GroupId>> {
    let path = project_dir.join(GROUPS_MANIFEST);
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(&path)
        .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&contents).map_err(|e| {
        StoreError::InvalidDocument {
            path: path.clone(),
            message: e.to_string(),
        }
        .into()
    })
}
