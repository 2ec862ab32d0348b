//! Group export
//!
//! Expands a target into its member artifacts, stages every member's operation
//! folder (and optionally the reference closure) into the export folder, then
//! archives the staged tree.

use super::archive::ArchiveBuilder;
use super::exporter::{ExportContext, ExportOutcome, OPERATION_FOLDER_PREFIX};
use super::staging::StagingCoordinator;
use super::walker::ReferenceWalker;
use crate::domain::{Artifact, ExportError, ExportTarget, Project};
use std::fs;
use std::path::Path;

/// Every artifact a target stands for
///
/// A single artifact expands to itself; a group to all of its members in
/// store order.
///
/// # Errors
///
/// Returns [`ExportError::EmptyExportTarget`] if a group has no members and
/// [`ExportError::Lookup`] if membership cannot be resolved.
pub fn expand_target(
    ctx: &ExportContext,
    target: &ExportTarget,
) -> Result<Vec<Artifact>, ExportError> {
    let group = match target {
        ExportTarget::Artifact(artifact) => return Ok(vec![artifact.clone()]),
        ExportTarget::Group(group) => group,
    };

    let locator = ctx.locator();
    let summaries = locator
        .members_of_group(&group.id)
        .map_err(|e| ExportError::Lookup(e.to_string()))?;
    if summaries.is_empty() {
        return Err(ExportError::EmptyExportTarget(format!(
            "group {} has no members",
            group.id
        )));
    }

    summaries
        .iter()
        .map(|summary| {
            locator
                .load_by_gid(&summary.gid)
                .map_err(|e| ExportError::Lookup(e.to_string()))
        })
        .collect()
}

/// Export `target` as one archive named `archive_name` inside `export_folder`
///
/// # Errors
///
/// Fails if the target is empty or any lookup, staging or archive step fails.
/// The export folder is left as it was at the point of failure.
pub fn group_export(
    ctx: &ExportContext,
    target: &ExportTarget,
    export_folder: &Path,
    project: &Project,
    archive_name: &str,
    include_links: bool,
) -> Result<ExportOutcome, ExportError> {
    let members = expand_target(ctx, target)?;
    export_members(ctx, &members, export_folder, project, archive_name, include_links)
}

/// Export already expanded members
///
/// # Errors
///
/// Same as [`group_export`].
pub fn export_members(
    ctx: &ExportContext,
    members: &[Artifact],
    export_folder: &Path,
    project: &Project,
    archive_name: &str,
    include_links: bool,
) -> Result<ExportOutcome, ExportError> {
    if members.is_empty() {
        return Err(ExportError::EmptyExportTarget(
            "no artifacts to export".to_string(),
        ));
    }

    fs::create_dir_all(export_folder).map_err(|e| ExportError::staging(export_folder, e))?;

    let mut links = None;
    if include_links {
        let mut walker = ReferenceWalker::new(ctx, export_folder);
        for member in members {
            walker.exclude(&member.gid);
        }
        for member in members {
            walker.collect_references(member)?;
        }
        links = walker.into_links().populated_path().map(Path::to_path_buf);
    }

    let mut staging = StagingCoordinator::new(export_folder);
    for member in members {
        let folder = ctx
            .locator()
            .operation_folder(&project.name, &member.operation)
            .map_err(|e| ExportError::Lookup(e.to_string()))?;
        staging.stage_directory(&folder)?;
    }

    let mut sources = staging.into_staged();
    if let Some(links) = links {
        sources.push(links);
    }

    let archive_path = export_folder.join(archive_name);
    ArchiveBuilder::new(OPERATION_FOLDER_PREFIX).build(&archive_path, &sources)?;

    tracing::info!(
        archive = %archive_path.display(),
        members = members.len(),
        folders = sources.len(),
        "Export archive built"
    );

    Ok(ExportOutcome {
        display_name: archive_name.to_string(),
        path: archive_path,
        deletable: true,
        members: members.len(),
    })
}
