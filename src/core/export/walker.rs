//! Reference graph walker
//!
//! Follows the references embedded in an artifact's backing file, and in the
//! backing files of everything those point to, copying each reached artifact
//! into the workspace's `Links` folder.
//!
//! Artifacts are visited at most once per export, keyed by GID, so cyclic
//! reference graphs terminate and shared dependencies are staged once.

use super::exporter::{ExportContext, LINKS_FOLDER};
use super::staging::copy_file_if_absent;
use crate::domain::{Artifact, ExportError, Gid, Reference};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// A backing file copied into the Links folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedLink {
    pub gid: Gid,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// The `Links` folder of one export workspace
///
/// The folder is only created once the first referenced artifact is staged.
#[derive(Debug)]
pub struct LinksFolder {
    path: PathBuf,
    created: bool,
    names: HashMap<String, Gid>,
    entries: Vec<StagedLink>,
}

impl LinksFolder {
    pub fn new(export_folder: &Path) -> Self {
        Self {
            path: export_folder.join(LINKS_FOLDER),
            created: false,
            names: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The folder path, if anything has been staged into it
    pub fn populated_path(&self) -> Option<&Path> {
        (!self.entries.is_empty()).then_some(self.path.as_path())
    }

    /// Staged backing files in staging order
    pub fn staged(&self) -> &[StagedLink] {
        &self.entries
    }

    /// Copy the backing file of `gid` into the folder
    ///
    /// Staging the same GID again is a no-op returning the existing copy. A
    /// different GID whose backing file shares a base name with an already
    /// staged one is stored as `<gid>_<name>` instead of being dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::StagingIo`] if the folder cannot be created or
    /// the copy fails.
    pub fn stage(&mut self, gid: &Gid, source: &Path) -> Result<PathBuf, ExportError> {
        if let Some(existing) = self.entries.iter().find(|e| &e.gid == gid) {
            return Ok(existing.destination.clone());
        }

        let base = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ExportError::staging(source, "backing file has no base name"))?;

        let name = match self.names.get(&base) {
            Some(owner) if owner != gid => {
                let renamed = format!("{gid}_{base}");
                tracing::warn!(
                    gid = %gid,
                    other_gid = %owner,
                    file = %base,
                    renamed = %renamed,
                    "Backing file name already staged for another artifact"
                );
                renamed
            }
            _ => base,
        };

        if !self.created {
            fs::create_dir_all(&self.path).map_err(|e| ExportError::staging(&self.path, e))?;
            self.created = true;
        }

        let destination = self.path.join(&name);
        copy_file_if_absent(source, &destination)?;

        self.names.insert(name, gid.clone());
        self.entries.push(StagedLink {
            gid: gid.clone(),
            source: source.to_path_buf(),
            destination: destination.clone(),
        });
        Ok(destination)
    }
}

/// Walks reference graphs for one export request
pub struct ReferenceWalker<'a> {
    ctx: &'a ExportContext,
    links: LinksFolder,
    visited: HashSet<Gid>,
}

impl<'a> ReferenceWalker<'a> {
    pub fn new(ctx: &'a ExportContext, export_folder: &Path) -> Self {
        Self {
            ctx,
            links: LinksFolder::new(export_folder),
            visited: HashSet::new(),
        }
    }

    /// Mark `gid` as already present in the export so it is never linked
    pub fn exclude(&mut self, gid: &Gid) {
        self.visited.insert(gid.clone());
    }

    pub fn links(&self) -> &LinksFolder {
        &self.links
    }

    pub fn into_links(self) -> LinksFolder {
        self.links
    }

    /// Stage everything `artifact` transitively references
    ///
    /// Returns the Links folder path once at least one artifact has been
    /// staged into it, across every call on this walker.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Lookup`] if a backing file cannot be read and
    /// [`ExportError::ReferenceResolution`] if a referenced GID cannot be
    /// loaded or located.
    pub fn collect_references(
        &mut self,
        artifact: &Artifact,
    ) -> Result<Option<PathBuf>, ExportError> {
        let mut pending = vec![artifact.clone()];

        while let Some(current) = pending.pop() {
            let references = self.references_of(&current)?;
            // Reverse so the first reference is walked first
            for reference in references.into_iter().rev() {
                let Some(gid) = reference.gid.clone() else {
                    continue;
                };
                if !self.visited.insert(gid.clone()) {
                    tracing::trace!(gid = %gid, "Reference already visited");
                    continue;
                }

                let target = self.resolve(&reference, &gid)?;
                pending.push(target);
            }
        }

        Ok(self.links.populated_path().map(Path::to_path_buf))
    }

    fn references_of(&self, artifact: &Artifact) -> Result<Vec<Reference>, ExportError> {
        let path = self
            .ctx
            .locator()
            .path_for_stored_artifact(artifact)
            .map_err(|e| ExportError::Lookup(format!("{}: {}", artifact.gid, e)))?;

        let file = self
            .ctx
            .reader()
            .open_read_only(&path)
            .map_err(|e| ExportError::Lookup(format!("{}: {}", path.display(), e)))?;

        file.gather_references()
            .map_err(|e| ExportError::Lookup(format!("{}: {}", path.display(), e)))
    }

    fn resolve(&mut self, reference: &Reference, gid: &Gid) -> Result<Artifact, ExportError> {
        let unresolved = |e: crate::domain::SatchelError| ExportError::ReferenceResolution {
            label: reference.label.clone(),
            gid: gid.to_string(),
            message: e.to_string(),
        };

        let target = self.ctx.locator().load_by_gid(gid).map_err(unresolved)?;
        let source = self
            .ctx
            .locator()
            .path_for_stored_artifact(&target)
            .map_err(unresolved)?;

        let destination = self.links.stage(gid, &source)?;
        tracing::debug!(
            label = %reference.label,
            gid = %gid,
            destination = %destination.display(),
            "Staged referenced artifact"
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn gid(value: &str) -> Gid {
        Gid::new(value).unwrap()
    }

    #[test]
    fn test_links_folder_is_created_lazily() {
        let workspace = TempDir::new().unwrap();
        let links = LinksFolder::new(workspace.path());
        assert_eq!(links.path(), workspace.path().join("Links"));
        assert!(links.populated_path().is_none());
        assert!(!links.path().exists());
    }

    #[test]
    fn test_stage_is_idempotent() {
        let store = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let source = store.path().join("conn.json");
        fs::write(&source, "{}").unwrap();

        let mut links = LinksFolder::new(workspace.path());
        let first = links.stage(&gid("conn-1"), &source).unwrap();
        let second = links.stage(&gid("conn-1"), &source).unwrap();

        assert_eq!(first, second);
        assert_eq!(links.staged().len(), 1);
        assert_eq!(fs::read_dir(links.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_name_collision_between_gids_is_renamed() {
        let store = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        fs::create_dir_all(store.path().join("1")).unwrap();
        fs::create_dir_all(store.path().join("2")).unwrap();
        fs::write(store.path().join("1/data.json"), "one").unwrap();
        fs::write(store.path().join("2/data.json"), "two").unwrap();

        let mut links = LinksFolder::new(workspace.path());
        links.stage(&gid("a"), &store.path().join("1/data.json")).unwrap();
        let renamed = links
            .stage(&gid("b"), &store.path().join("2/data.json"))
            .unwrap();

        assert_eq!(renamed, workspace.path().join("Links/b_data.json"));
        assert_eq!(fs::read_to_string(renamed).unwrap(), "two");
        assert_eq!(
            fs::read_to_string(workspace.path().join("Links/data.json")).unwrap(),
            "one"
        );
    }
}
