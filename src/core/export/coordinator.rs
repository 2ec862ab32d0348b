//! Export coordinator - main orchestrator for an export request
//!
//! This module ties the configured store, format registry and workspace
//! handling together: it resolves what is being exported, picks a format,
//! runs it inside a fresh workspace and delivers the result to the output
//! directory.

use super::exporter::{ExclusionSet, ExportContext, Exporter, LINKS_FOLDER};
use super::formats::ExporterRegistry;
use super::summary::ExportReport;
use crate::adapters::store::create_store;
use crate::config::{ExportConfig, SatchelConfig};
use crate::core::verification::checksum_file;
use crate::domain::{
    ExportError, ExportTarget, Gid, GroupId, Project, Result, SatchelError,
};
use crate::{log_error_with_context, log_export_complete, log_export_start};
use chrono::Local;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Identifier of what an export request is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    Artifact(Gid),
    Group(GroupId),
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Artifact(gid) => write!(f, "artifact {gid}"),
            TargetRef::Group(id) => write!(f, "group {id}"),
        }
    }
}

/// Export coordinator
pub struct ExportCoordinator {
    export_config: ExportConfig,
    context: ExportContext,
    registry: ExporterRegistry,
}

impl ExportCoordinator {
    /// Create a coordinator over the configured filesystem store
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or a type list is
    /// invalid.
    pub fn new(config: &SatchelConfig) -> Result<Self> {
        let (locator, reader) = create_store(&config.storage)?;
        let exclusions = ExclusionSet::from_names(&config.export.excluded_types)
            .map_err(SatchelError::Configuration)?;
        let context = ExportContext::new(locator, reader, exclusions);
        let registry = ExporterRegistry::from_config(&config.formats, context.clone())?;

        tracing::info!(
            formats = registry.len(),
            excluded_types = context.exclusions().len(),
            "Export coordinator ready"
        );

        Ok(Self::from_parts(config.export.clone(), context, registry))
    }

    /// Create a coordinator from already built parts
    pub fn from_parts(
        export_config: ExportConfig,
        context: ExportContext,
        registry: ExporterRegistry,
    ) -> Self {
        Self {
            export_config,
            context,
            registry,
        }
    }

    pub fn registry(&self) -> &ExporterRegistry {
        &self.registry
    }

    pub fn context(&self) -> &ExportContext {
        &self.context
    }

    /// Turn an identifier into the target and the project it lives in
    ///
    /// # Errors
    ///
    /// Returns a store error if the GID or group is unknown.
    pub fn resolve_target(&self, target: &TargetRef) -> Result<(ExportTarget, Project)> {
        let locator = self.context.locator();
        let resolved: ExportTarget = match target {
            TargetRef::Artifact(gid) => locator.load_by_gid(gid)?.into(),
            TargetRef::Group(id) => locator.find_group(id)?.into(),
        };
        let project = resolved.project();
        Ok((resolved, project))
    }

    /// Formats that accept the target, in preference order
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be resolved.
    pub fn accepting_formats(&self, target: &TargetRef) -> Result<Vec<Arc<dyn Exporter>>> {
        let (resolved, _) = self.resolve_target(target)?;
        Ok(self.registry.accepting(&resolved))
    }

    /// Export `target` with the named format, or the first accepting one
    ///
    /// The export runs synchronously on the calling thread. The workspace is
    /// removed afterwards unless `keep_workspace` is set, whether or not the
    /// export succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is unknown, no format accepts it, or
    /// the export itself fails.
    pub fn execute_export(&self, target: &TargetRef, format: Option<&str>) -> Result<ExportReport> {
        let start_time = Instant::now();
        let (resolved, project) = self.resolve_target(target)?;
        let exporter = self.select_exporter(&resolved, format)?;

        log_export_start!(resolved, exporter.name());

        let workspace = self.allocate_workspace()?;
        let result = self.run_in_workspace(exporter.as_ref(), &resolved, &project, &workspace);

        if self.export_config.keep_workspace {
            tracing::info!(workspace = %workspace.display(), "Keeping export workspace");
        } else if let Err(e) = fs::remove_dir_all(&workspace) {
            tracing::warn!(
                workspace = %workspace.display(),
                error = %e,
                "Failed to remove export workspace"
            );
        }

        let mut report = match result {
            Ok(report) => report,
            Err(e) => {
                log_error_with_context!(&e, "Export failed");
                return Err(e);
            }
        };
        report.duration = start_time.elapsed();

        log_export_complete!(report.path.display(), report.duration);
        report.log_summary();
        Ok(report)
    }

    fn select_exporter(
        &self,
        target: &ExportTarget,
        format: Option<&str>,
    ) -> Result<Arc<dyn Exporter>> {
        let unsupported = |format: &str| ExportError::Unsupported {
            format: format.to_string(),
            target: target.to_string(),
        };

        match format {
            Some(name) => {
                let exporter = self.registry.get(name).ok_or_else(|| {
                    SatchelError::Validation(format!("Unknown or disabled export format: {name}"))
                })?;
                if !exporter.accepts(target) {
                    return Err(unsupported(exporter.name()).into());
                }
                Ok(exporter)
            }
            None => self
                .registry
                .accepting(target)
                .into_iter()
                .next()
                .ok_or_else(|| unsupported("any configured format").into()),
        }
    }

    fn allocate_workspace(&self) -> Result<PathBuf> {
        let name = format!(
            "{}_{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            Uuid::new_v4().simple()
        );
        let workspace = Path::new(&self.export_config.workspace_root).join(name);
        fs::create_dir_all(&workspace).map_err(|e| {
            SatchelError::Io(format!(
                "Failed to create export workspace {}: {}",
                workspace.display(),
                e
            ))
        })?;
        tracing::debug!(workspace = %workspace.display(), "Export workspace created");
        Ok(workspace)
    }

    fn run_in_workspace(
        &self,
        exporter: &dyn Exporter,
        target: &ExportTarget,
        project: &Project,
        workspace: &Path,
    ) -> Result<ExportReport> {
        let outcome = exporter.export(target, workspace, project)?;
        let (sha256, size_bytes) = checksum_file(&outcome.path)?;

        let links_staged = count_files(&workspace.join(LINKS_FOLDER));

        let (display_name, path) = if outcome.deletable {
            let output_dir = &self.export_config.output_dir;
            let path = deliver(&outcome.path, output_dir, &outcome.display_name)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(outcome.display_name);
            (name, path)
        } else {
            (outcome.display_name, outcome.path)
        };

        Ok(ExportReport {
            format: exporter.name().to_string(),
            label: exporter.label(),
            target: target.to_string(),
            display_name,
            path,
            deletable: outcome.deletable,
            members: outcome.members,
            links_staged,
            sha256,
            size_bytes,
            duration: Default::default(),
        })
    }
}

/// Move a finished archive into `output_dir`
///
/// Never replaces an existing file: a taken name gets a `_<n>` suffix. Falls
/// back to copy-and-remove when the workspace is on another filesystem.
fn deliver(archive: &Path, output_dir: &str, name: &str) -> Result<PathBuf> {
    let output_dir = Path::new(output_dir);
    fs::create_dir_all(output_dir).map_err(|e| {
        SatchelError::Io(format!(
            "Failed to create output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let destination = free_destination(output_dir, name);
    if destination.file_name().and_then(|n| n.to_str()) != Some(name) {
        tracing::warn!(
            requested = name,
            delivered = %destination.display(),
            "Output name taken, delivering under a new name"
        );
    }
    if fs::rename(archive, &destination).is_err() {
        fs::copy(archive, &destination).map_err(|e| {
            SatchelError::Io(format!(
                "Failed to deliver {} to {}: {}",
                archive.display(),
                destination.display(),
                e
            ))
        })?;
        fs::remove_file(archive)?;
    }
    Ok(destination)
}

/// First of `name`, `<stem>_1.<ext>`, `<stem>_2.<ext>`... not present in `dir`
fn free_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem}_{n}.{ext}")),
            None => dir.join(format!("{stem}_{n}")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_ref_display() {
        assert_eq!(
            TargetRef::Artifact(Gid::new("sim-001").unwrap()).to_string(),
            "artifact sim-001"
        );
        assert_eq!(
            TargetRef::Group(GroupId::new("grp-42").unwrap()).to_string(),
            "group grp-42"
        );
    }

    #[test]
    fn test_count_files_missing_dir() {
        assert_eq!(count_files(Path::new("/definitely/not/here")), 0);
    }

    #[test]
    fn test_deliver_moves_archive() {
        let tmp = tempfile::TempDir::new().unwrap();
        let archive = tmp.path().join("work/out.zip");
        fs::create_dir_all(archive.parent().unwrap()).unwrap();
        fs::write(&archive, b"zip").unwrap();
        let output = tmp.path().join("exports");

        let delivered = deliver(&archive, output.to_str().unwrap(), "out.zip").unwrap();

        assert_eq!(delivered, output.join("out.zip"));
        assert!(delivered.exists());
        assert!(!archive.exists());
    }

    #[test]
    fn test_deliver_keeps_existing_archive() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("exports");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("out.zip"), b"first").unwrap();
        fs::write(output.join("out_1.zip"), b"second").unwrap();

        let archive = tmp.path().join("out.zip");
        fs::write(&archive, b"third").unwrap();
        let delivered = deliver(&archive, output.to_str().unwrap(), "out.zip").unwrap();

        assert_eq!(delivered, output.join("out_2.zip"));
        assert_eq!(fs::read(output.join("out.zip")).unwrap(), b"first");
        assert_eq!(fs::read(output.join("out_1.zip")).unwrap(), b"second");
        assert_eq!(fs::read(&delivered).unwrap(), b"third");
    }

    #[test]
    fn test_free_destination_without_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("bundle"), b"x").unwrap();
        assert_eq!(
            free_destination(tmp.path(), "bundle"),
            tmp.path().join("bundle_1")
        );
    }
}
