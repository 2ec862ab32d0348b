//! Artifact lookup abstraction
//!
//! This module provides the trait-based seam between the export core and
//! whatever holds the artifacts.

pub mod traits;

pub use traits::{ArtifactLocator, StructuredFile, StructuredFileReader};
