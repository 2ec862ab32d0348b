//! Filesystem artifact store
//!
//! Concrete [`ArtifactLocator`] and [`StructuredFileReader`] implementations
//! over a directory tree of JSON backing files.

pub mod document;
pub mod filesystem;
pub mod reader;

pub use document::ArtifactDocument;
pub use filesystem::{FilesystemStore, GROUPS_MANIFEST};
pub use reader::JsonFileReader;

use crate::adapters::locator::{ArtifactLocator, StructuredFileReader};
use crate::config::StorageConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the locator and reader pair for the configured store
///
/// # Errors
///
/// Returns an error if the store cannot be opened or indexed.
pub fn create_store(
    config: &StorageConfig,
) -> Result<(Arc<dyn ArtifactLocator>, Arc<dyn StructuredFileReader>)> {
    tracing::info!(root = %config.root, "Opening filesystem artifact store");
    let store = FilesystemStore::open(&config.root)?;
    Ok((Arc::new(store), Arc::new(JsonFileReader::new())))
}
