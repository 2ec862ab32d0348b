//! Shared fixtures for integration tests
//!
//! Builds a real on-disk artifact store in a temporary directory.

#![allow(dead_code)]

use satchel::adapters::store::{FilesystemStore, JsonFileReader, GROUPS_MANIFEST};
use satchel::config::DEFAULT_EXCLUDED_TYPES;
use satchel::core::export::{ExclusionSet, ExportContext};
use serde_json::{json, Map, Value};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const PROJECT: &str = "default";

/// A temporary artifact store
pub struct StoreFixture {
    pub dir: TempDir,
}

impl StoreFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a backing file `<type>_<gid>.json` into `<project>/<op>/`
    pub fn artifact(
        &self,
        op: &str,
        gid: &str,
        type_tag: &str,
        group: Option<&str>,
        references: &[(&str, Option<&str>)],
    ) -> PathBuf {
        let mut refs = Map::new();
        for (label, target) in references {
            refs.insert(
                label.to_string(),
                target.map_or(Value::Null, |t| Value::String(t.to_string())),
            );
        }

        let mut doc = json!({
            "gid": gid,
            "type": type_tag,
            "references": refs,
            "title": format!("{type_tag} {gid}"),
        });
        if let Some(group) = group {
            doc["group"] = Value::String(group.to_string());
        }

        let dir = self.root().join(PROJECT).join(op);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{type_tag}_{gid}.json"));
        fs::write(&path, serde_json::to_vec_pretty(&doc).unwrap()).unwrap();
        path
    }

    /// Write a non-artifact file into an operation folder
    pub fn extra_file(&self, op: &str, name: &str, contents: &[u8]) {
        let path = self.root().join(PROJECT).join(op).join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Declare groups in the project manifest, members or not
    pub fn declare_groups(&self, ids: &[&str]) {
        let dir = self.root().join(PROJECT);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(GROUPS_MANIFEST), serde_json::to_vec(ids).unwrap()).unwrap();
    }

    /// Index the store and build an export context with the default exclusions
    pub fn context(&self) -> ExportContext {
        let store = FilesystemStore::open(self.root()).unwrap();
        ExportContext::new(
            Arc::new(store),
            Arc::new(JsonFileReader::new()),
            ExclusionSet::from_names(DEFAULT_EXCLUDED_TYPES).unwrap(),
        )
    }
}

/// Entry names of a zip archive, in archive order
pub fn archive_entries(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Number of entries whose file name is `name`, anywhere in the archive
pub fn count_named(entries: &[String], name: &str) -> usize {
    entries
        .iter()
        .filter(|e| e.rsplit('/').next() == Some(name))
        .count()
}
