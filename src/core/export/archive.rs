//! Archive builder
//!
//! Writes staged folders into a single deflated zip file. Each source folder
//! lands under `<prefix><folder base name>/`. Entries are written in sorted
//! order with a fixed timestamp, so the same staged tree always produces the
//! same archive bytes.

use crate::domain::ExportError;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds zip archives from staged folders
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    prefix: String,
}

impl ArchiveBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Write every file of `sources` into a new archive at `destination`
    ///
    /// A pre-existing file at `destination` is overwritten. Repeated sources
    /// are archived once. Returns the number of file entries written.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::ArchiveBuild`] if a source is not a readable
    /// directory or the destination cannot be written.
    pub fn build(&self, destination: &Path, sources: &[PathBuf]) -> Result<usize, ExportError> {
        let mut seen = HashSet::new();
        let sources: Vec<&PathBuf> = sources.iter().filter(|s| seen.insert(*s)).collect();

        // Fail before touching the destination
        for source in &sources {
            if !source.is_dir() {
                return Err(ExportError::archive(source.as_path(), "not a readable directory"));
            }
        }

        let file = File::create(destination).map_err(|e| ExportError::archive(destination, e))?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let mut entries = 0;
        for source in sources {
            entries += self.write_folder(&mut writer, source, options)?;
        }

        writer
            .finish()
            .map_err(|e| ExportError::archive(destination, e))?;

        tracing::debug!(
            archive = %destination.display(),
            entries,
            "Archive written"
        );
        Ok(entries)
    }

    fn write_folder<W: io::Write + io::Seek>(
        &self,
        writer: &mut ZipWriter<W>,
        source: &Path,
        options: SimpleFileOptions,
    ) -> Result<usize, ExportError> {
        let base = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ExportError::archive(source, "source folder has no base name"))?;
        let root = format!("{}{}", self.prefix, base);

        let mut entries = 0;
        for entry in WalkDir::new(source).sort_by_file_name() {
            let entry = entry.map_err(|e| ExportError::archive(source, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| ExportError::archive(entry.path(), e))?;
            let name = entry_name(&root, relative);

            writer
                .start_file(name, options)
                .map_err(|e| ExportError::archive(entry.path(), e))?;
            let mut input = File::open(entry.path()).map_err(|e| ExportError::archive(entry.path(), e))?;
            io::copy(&mut input, writer).map_err(|e| ExportError::archive(entry.path(), e))?;
            entries += 1;
        }
        Ok(entries)
    }
}

/// Zip entry name: `/`-separated regardless of platform
fn entry_name(root: &str, relative: &Path) -> String {
    let mut name = root.to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}
