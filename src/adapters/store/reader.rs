//! JSON structured-file reader

use super::document::ArtifactDocument;
use crate::adapters::locator::{StructuredFile, StructuredFileReader};
use crate::domain::{Reference, Result};
use std::path::Path;

/// Reads artifact backing files written as JSON documents
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFileReader;

impl JsonFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl StructuredFileReader for JsonFileReader {
    fn open_read_only(&self, path: &Path) -> Result<Box<dyn StructuredFile>> {
        let document = ArtifactDocument::read(path)?;
        Ok(Box::new(JsonStructuredFile { document }))
    }
}

/// A parsed, read-only backing file
#[derive(Debug)]
pub struct JsonStructuredFile {
    document: ArtifactDocument,
}

impl StructuredFile for JsonStructuredFile {
    fn gather_references(&self) -> Result<Vec<Reference>> {
        Ok(self.document.references())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_gather_references_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ts.json");
        fs::write(
            &path,
            r#"{"gid": "ts-1", "type": "TimeSeries", "references": {"connectivity": "conn-1", "surface": null}}"#,
        )
        .unwrap();

        let file = JsonFileReader::new().open_read_only(&path).unwrap();
        let references = file.gather_references().unwrap();
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].gid.as_ref().unwrap().as_str(), "conn-1");
        assert!(references[1].gid.is_none());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let result = JsonFileReader::new().open_read_only(&tmp.path().join("missing.json"));
        assert!(result.is_err());
    }
}
