//! Staging of operation folders into an export workspace
//!
//! Copies are deep and content-preserving. A file that already exists at its
//! destination is never overwritten, so staging the same folder twice, or two
//! folders that share files, leaves exactly one copy on disk.

use crate::domain::ExportError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copies distinct source folders into a workspace
#[derive(Debug)]
pub struct StagingCoordinator {
    workspace: PathBuf,
    staged: Vec<PathBuf>,
    sources: HashMap<PathBuf, PathBuf>,
}

impl StagingCoordinator {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            staged: Vec::new(),
            sources: HashMap::new(),
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Staged folders in staging order
    pub fn staged(&self) -> &[PathBuf] {
        &self.staged
    }

    pub fn into_staged(self) -> Vec<PathBuf> {
        self.staged
    }

    /// Copy `source` into the workspace under its own base name
    ///
    /// Returns the staged folder. A source that was already staged is not
    /// copied again.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::StagingIo`] if the source is not a readable
    /// directory or a copy fails.
    pub fn stage_directory(&mut self, source: &Path) -> Result<PathBuf, ExportError> {
        if let Some(staged) = self.sources.get(source) {
            return Ok(staged.clone());
        }

        let name = source
            .file_name()
            .ok_or_else(|| ExportError::staging(source, "source folder has no base name"))?;
        let destination = self.workspace.join(name);

        let copied = copy_dir(source, &destination)?;
        tracing::debug!(
            source = %source.display(),
            destination = %destination.display(),
            files = copied,
            "Staged operation folder"
        );

        self.sources.insert(source.to_path_buf(), destination.clone());
        self.staged.push(destination.clone());
        Ok(destination)
    }
}

/// Copy a single file unless the destination already exists
///
/// Returns whether a copy happened.
pub(crate) fn copy_file_if_absent(source: &Path, destination: &Path) -> Result<bool, ExportError> {
    if destination.exists() {
        return Ok(false);
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::staging(parent, e))?;
    }
    fs::copy(source, destination).map_err(|e| ExportError::staging(source, e))?;
    Ok(true)
}

/// Deep copy of `source` into `destination`; returns the number of files copied
fn copy_dir(source: &Path, destination: &Path) -> Result<usize, ExportError> {
    if !source.is_dir() {
        return Err(ExportError::staging(source, "not a readable directory"));
    }

    let mut copied = 0;
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| ExportError::staging(source, e))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| ExportError::staging(entry.path(), e))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| ExportError::staging(&target, e))?;
        } else if copy_file_if_absent(entry.path(), &target)? {
            copied += 1;
        }
    }
    Ok(copied)
}
