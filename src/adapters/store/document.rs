//! On-disk artifact document format
//!
//! Each backing file is a JSON document. Only the header fields below are
//! interpreted; everything else is payload and is carried untouched. JSON
//! objects without both `gid` and `type` are operation output, not artifacts.
//!
//! ```json
//! {
//!   "gid": "sim-001",
//!   "type": "TimeSeries",
//!   "group": "grp-42",
//!   "references": { "connectivity": "conn-7", "surface": null },
//!   "data": [0.1, 0.2]
//! }
//! ```

use crate::domain::{Gid, GroupId, Reference, StoreError, TypeTag};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Parsed backing file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactDocument {
    pub gid: Gid,

    #[serde(rename = "type")]
    pub type_tag: TypeTag,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,

    /// Reference slots keyed by label; unset slots hold `null` or `""`
    #[serde(default)]
    pub references: BTreeMap<String, Option<String>>,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ArtifactDocument {
    /// Read and parse a backing file
    pub fn read(path: &Path) -> Result<Self, StoreError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        serde_json::from_str(&contents).map_err(|e| invalid(path, e))
    }

    /// Read a JSON file from an operation folder
    ///
    /// Returns `None` when the file carries no artifact header. A file that
    /// has the header but fails to parse is still an error.
    pub fn read_if_artifact(path: &Path) -> Result<Option<Self>, StoreError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let value: Value = serde_json::from_str(&contents).map_err(|e| invalid(path, e))?;

        if !has_header(&value) {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| invalid(path, e))
    }

    /// Reference slots in label order
    pub fn references(&self) -> Vec<Reference> {
        self.references
            .iter()
            .map(|(label, target)| {
                let gid = target.as_deref().and_then(|raw| Gid::new(raw).ok());
                Reference::new(label.clone(), gid)
            })
            .collect()
    }
}

fn has_header(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("gid") && obj.contains_key("type"))
}

fn invalid(path: &Path, err: serde_json::Error) -> StoreError {
    StoreError::InvalidDocument {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_document_with_payload() {
        let doc: ArtifactDocument = serde_json::from_value(json!({
            "gid": "sim-001",
            "type": "TimeSeries",
            "group": "grp-42",
            "references": {"connectivity": "conn-7"},
            "data": [1, 2, 3]
        }))
        .unwrap();

        assert_eq!(doc.gid.as_str(), "sim-001");
        assert_eq!(doc.type_tag.as_str(), "TimeSeries");
        assert_eq!(doc.group.as_ref().map(|g| g.as_str()), Some("grp-42"));
        assert_eq!(doc.payload.get("data"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn test_unset_slots_have_no_gid() {
        let doc: ArtifactDocument = serde_json::from_value(json!({
            "gid": "sim-001",
            "type": "TimeSeries",
            "references": {"connectivity": "conn-7", "surface": null, "region_mapping": ""}
        }))
        .unwrap();

        let references = doc.references();
        assert_eq!(references.len(), 3);
        assert_eq!(references[0].label, "connectivity");
        assert_eq!(references[0].gid.as_ref().map(|g| g.as_str()), Some("conn-7"));
        assert!(references[1].gid.is_none());
        assert!(references[2].gid.is_none());
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let result = serde_json::from_value::<ArtifactDocument>(json!({"type": "TimeSeries"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_if_artifact_skips_plain_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let meta = tmp.path().join("operation_meta.json");
        fs::write(&meta, r#"{"status": "done"}"#).unwrap();
        let list = tmp.path().join("values.json");
        fs::write(&list, "[1, 2, 3]").unwrap();

        assert!(ArtifactDocument::read_if_artifact(&meta).unwrap().is_none());
        assert!(ArtifactDocument::read_if_artifact(&list).unwrap().is_none());
    }

    #[test]
    fn test_read_if_artifact_rejects_bad_header() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, r#"{"gid": "", "type": "TimeSeries"}"#).unwrap();

        assert!(ArtifactDocument::read_if_artifact(&path).is_err());
    }
}
