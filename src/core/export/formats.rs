//! Concrete export formats and the registry that holds them

use super::exporter::{ExportContext, ExportOutcome, Exporter, SupportedTypes};
use super::group::{expand_target, export_members};
use crate::config::FormatsConfig;
use crate::domain::{Artifact, ExportError, ExportTarget, Project, SatchelError};
use std::path::Path;
use std::sync::Arc;

/// Default extension when a backing file has none
const DEFAULT_NATIVE_EXTENSION: &str = "json";

/// Shared body of the archive formats
fn export_archive<E: Exporter + ?Sized>(
    exporter: &E,
    target: &ExportTarget,
    export_folder: &Path,
    project: &Project,
    include_links: bool,
) -> Result<ExportOutcome, ExportError> {
    let members = expand_target(exporter.context(), target)?;
    let first = &members[0];

    if exporter.context().exclusions().contains(&first.type_tag)
        || !exporter.supported_types().contains(&first.type_tag)
    {
        return Err(ExportError::Unsupported {
            format: exporter.name().to_string(),
            target: target.to_string(),
        });
    }

    let archive_name = exporter.export_file_name(first);
    export_members(
        exporter.context(),
        &members,
        export_folder,
        project,
        &archive_name,
        include_links,
    )
}

/// Zip of the target's operation folders
#[derive(Debug, Clone)]
pub struct ZipExporter {
    ctx: ExportContext,
    supported: SupportedTypes,
}

impl ZipExporter {
    pub const NAME: &'static str = "ZipExporter";

    pub fn new(ctx: ExportContext, supported: SupportedTypes) -> Self {
        Self { ctx, supported }
    }
}

impl Exporter for ZipExporter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn label(&self) -> String {
        "Zip".to_string()
    }

    fn supported_types(&self) -> &SupportedTypes {
        &self.supported
    }

    fn context(&self) -> &ExportContext {
        &self.ctx
    }

    fn export_file_extension(&self, _artifact: &Artifact) -> String {
        "zip".to_string()
    }

    fn export(
        &self,
        target: &ExportTarget,
        export_folder: &Path,
        project: &Project,
    ) -> Result<ExportOutcome, ExportError> {
        export_archive(self, target, export_folder, project, false)
    }
}

/// Zip of the target's operation folders plus everything they reference
#[derive(Debug, Clone)]
pub struct LinkedZipExporter {
    ctx: ExportContext,
    supported: SupportedTypes,
}

impl LinkedZipExporter {
    pub const NAME: &'static str = "LinkedZipExporter";

    pub fn new(ctx: ExportContext, supported: SupportedTypes) -> Self {
        Self { ctx, supported }
    }
}

impl Exporter for LinkedZipExporter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn label(&self) -> String {
        "Zip with links".to_string()
    }

    fn supported_types(&self) -> &SupportedTypes {
        &self.supported
    }

    fn context(&self) -> &ExportContext {
        &self.ctx
    }

    fn export_file_extension(&self, _artifact: &Artifact) -> String {
        "zip".to_string()
    }

    fn export(
        &self,
        target: &ExportTarget,
        export_folder: &Path,
        project: &Project,
    ) -> Result<ExportOutcome, ExportError> {
        export_archive(self, target, export_folder, project, true)
    }
}

/// Serves an artifact's backing file as-is
///
/// The served file is the canonical copy, so the outcome is never deletable.
#[derive(Debug, Clone)]
pub struct NativeFileExporter {
    ctx: ExportContext,
    supported: SupportedTypes,
}

impl NativeFileExporter {
    pub const NAME: &'static str = "NativeFileExporter";

    pub fn new(ctx: ExportContext, supported: SupportedTypes) -> Self {
        Self { ctx, supported }
    }
}

impl Exporter for NativeFileExporter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn label(&self) -> String {
        "Native file".to_string()
    }

    fn supported_types(&self) -> &SupportedTypes {
        &self.supported
    }

    fn context(&self) -> &ExportContext {
        &self.ctx
    }

    fn skips_group_exports(&self) -> bool {
        true
    }

    fn export_file_extension(&self, artifact: &Artifact) -> String {
        self.ctx
            .locator()
            .path_for_stored_artifact(artifact)
            .ok()
            .and_then(|path| {
                path.extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| DEFAULT_NATIVE_EXTENSION.to_string())
    }

    fn export(
        &self,
        target: &ExportTarget,
        _export_folder: &Path,
        _project: &Project,
    ) -> Result<ExportOutcome, ExportError> {
        let ExportTarget::Artifact(artifact) = target else {
            return Err(ExportError::Unsupported {
                format: self.name().to_string(),
                target: target.to_string(),
            });
        };
        if !self.accepts(target) {
            return Err(ExportError::Unsupported {
                format: self.name().to_string(),
                target: target.to_string(),
            });
        }

        let path = self
            .ctx
            .locator()
            .path_for_stored_artifact(artifact)
            .map_err(|e| ExportError::Lookup(e.to_string()))?;

        Ok(ExportOutcome {
            display_name: self.export_file_name(artifact),
            path,
            deletable: false,
            members: 1,
        })
    }
}

/// The export formats enabled for a deployment
///
/// Formats are kept in preference order: linked zip, plain zip, native file.
#[derive(Default)]
pub struct ExporterRegistry {
    exporters: Vec<Arc<dyn Exporter>>,
}

impl ExporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the formats enabled in `[formats]`
    ///
    /// Formats configured with an empty type list are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if a type list holds an invalid tag.
    pub fn from_config(config: &FormatsConfig, ctx: ExportContext) -> crate::domain::Result<Self> {
        let mut registry = Self::new();

        let linked_zip = supported(&config.linked_zip)?;
        if !linked_zip.is_empty() {
            registry.register(Arc::new(LinkedZipExporter::new(ctx.clone(), linked_zip)));
        }

        let zip = supported(&config.zip)?;
        if !zip.is_empty() {
            registry.register(Arc::new(ZipExporter::new(ctx.clone(), zip)));
        }

        let native = supported(&config.native)?;
        if !native.is_empty() {
            registry.register(Arc::new(NativeFileExporter::new(ctx, native)));
        }

        tracing::debug!(formats = registry.len(), "Export formats registered");
        Ok(registry)
    }

    pub fn register(&mut self, exporter: Arc<dyn Exporter>) {
        self.exporters.push(exporter);
    }

    /// Find a format by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<Arc<dyn Exporter>> {
        self.exporters
            .iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Exporter>> {
        self.exporters.iter()
    }

    /// Formats that accept `target`, in preference order
    pub fn accepting(&self, target: &ExportTarget) -> Vec<Arc<dyn Exporter>> {
        self.exporters
            .iter()
            .filter(|e| e.accepts(target))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.exporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exporters.is_empty()
    }
}

fn supported(names: &[String]) -> crate::domain::Result<SupportedTypes> {
    SupportedTypes::from_names(names).map_err(SatchelError::Configuration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::{FilesystemStore, JsonFileReader};
    use crate::core::export::exporter::ExclusionSet;
    use crate::domain::{Gid, GroupId};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write_doc(root: &Path, op: &str, file: &str, doc: serde_json::Value) {
        let dir = root.join("default").join(op);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), serde_json::to_vec(&doc).unwrap()).unwrap();
    }

    fn context(root: &Path) -> ExportContext {
        let store = FilesystemStore::open(root).unwrap();
        ExportContext::new(
            Arc::new(store),
            Arc::new(JsonFileReader::new()),
            ExclusionSet::from_names(crate::config::DEFAULT_EXCLUDED_TYPES).unwrap(),
        )
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write_doc(
            tmp.path(),
            "12",
            "ts.json",
            json!({"gid": "sim-001", "type": "TimeSeries"}),
        );
        write_doc(
            tmp.path(),
            "13",
            "wrap.json",
            json!({"gid": "vw-1", "type": "ValueWrapper"}),
        );
        for (op, gid) in [("20", "pse-1"), ("21", "pse-2")] {
            write_doc(
                tmp.path(),
                op,
                &format!("{gid}.json"),
                json!({"gid": gid, "type": "DatatypeMeasure", "group": "grp-1"}),
            );
        }
        tmp
    }

    fn artifact_target(ctx: &ExportContext, gid: &str) -> ExportTarget {
        ctx.locator()
            .load_by_gid(&Gid::new(gid).unwrap())
            .unwrap()
            .into()
    }

    fn group_target(ctx: &ExportContext, id: &str) -> ExportTarget {
        ctx.locator()
            .find_group(&GroupId::new(id).unwrap())
            .unwrap()
            .into()
    }

    #[test]
    fn test_registry_order_and_lookup() {
        let tmp = fixture();
        let registry =
            ExporterRegistry::from_config(&FormatsConfig::default(), context(tmp.path())).unwrap();

        let names: Vec<&str> = registry.iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec!["LinkedZipExporter", "ZipExporter", "NativeFileExporter"]
        );
        assert_eq!(registry.get("zipexporter").unwrap().label(), "Zip");
        assert!(registry.get("Tarball").is_none());
    }

    #[test]
    fn test_disabled_format_is_not_registered() {
        let tmp = fixture();
        let config = FormatsConfig {
            zip: vec!["TimeSeries".to_string()],
            linked_zip: vec![],
            native: vec![],
        };
        let registry = ExporterRegistry::from_config(&config, context(tmp.path())).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(LinkedZipExporter::NAME).is_none());
    }

    #[test]
    fn test_excluded_type_is_accepted_by_no_format() {
        let tmp = fixture();
        let ctx = context(tmp.path());
        let registry = ExporterRegistry::from_config(&FormatsConfig::default(), ctx.clone()).unwrap();
        assert!(registry.accepting(&artifact_target(&ctx, "vw-1")).is_empty());
    }

    #[test]
    fn test_native_format_skips_groups() {
        let tmp = fixture();
        let ctx = context(tmp.path());
        let native = NativeFileExporter::new(ctx.clone(), SupportedTypes::All);

        assert!(native.accepts(&artifact_target(&ctx, "pse-1")));
        assert!(!native.accepts(&group_target(&ctx, "grp-1")));
    }

    #[test]
    fn test_native_export_serves_canonical_file() {
        let tmp = fixture();
        let ctx = context(tmp.path());
        let native = NativeFileExporter::new(ctx.clone(), SupportedTypes::All);
        let target = artifact_target(&ctx, "sim-001");
        let workspace = TempDir::new().unwrap();

        let outcome = native
            .export(&target, workspace.path(), &target.project())
            .unwrap();

        assert!(!outcome.deletable);
        assert_eq!(outcome.path, tmp.path().join("default/12/ts.json"));
        assert!(outcome.display_name.ends_with("_TimeSeries.json"));
    }

    #[test]
    fn test_unsupported_type_is_rejected_on_export() {
        let tmp = fixture();
        let ctx = context(tmp.path());
        let zip = ZipExporter::new(ctx.clone(), SupportedTypes::from_names(&["Connectivity"]).unwrap());
        let target = artifact_target(&ctx, "sim-001");
        let workspace = TempDir::new().unwrap();

        assert!(!zip.accepts(&target));
        let err = zip
            .export(&target, workspace.path(), &target.project())
            .unwrap_err();
        assert!(matches!(err, ExportError::Unsupported { .. }));
    }

    #[test]
    fn test_group_zip_export() {
        let tmp = fixture();
        let ctx = context(tmp.path());
        let zip = ZipExporter::new(ctx.clone(), SupportedTypes::All);
        let target = group_target(&ctx, "grp-1");
        let workspace = TempDir::new().unwrap();

        let outcome = zip
            .export(&target, workspace.path(), &target.project())
            .unwrap();

        assert!(outcome.deletable);
        assert!(outcome.display_name.ends_with("_DatatypeMeasure.zip"));
        assert_eq!(outcome.path, workspace.path().join(&outcome.display_name));
        assert!(workspace.path().join("20/pse-1.json").exists());
        assert!(workspace.path().join("21/pse-2.json").exists());
    }
}
