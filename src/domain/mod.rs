//! Domain models and types for Satchel.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`Gid`], [`TypeTag`], [`GroupId`], [`OperationId`], [`ProjectName`])
//! - **Domain models** ([`Artifact`], [`ArtifactGroup`], [`ExportTarget`], [`Reference`])
//! - **Error types** ([`SatchelError`], [`ExportError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! ```rust
//! use satchel::domain::{Artifact, ExportTarget, Gid, OperationId, ProjectName, TypeTag};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let artifact = Artifact::new(
//!     Gid::new("sim-001")?,
//!     TypeTag::new("TimeSeries")?,
//!     OperationId::new("12")?,
//!     ProjectName::new("default")?,
//! );
//! let target = ExportTarget::from(artifact);
//! assert!(!target.is_group());
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod errors;
pub mod ids;
pub mod reference;
pub mod result;

// Re-export commonly used types for convenience
pub use artifact::{Artifact, ArtifactGroup, ArtifactSummary, ExportTarget, Project};
pub use errors::{ExportError, SatchelError, StoreError};
pub use ids::{Gid, GroupId, OperationId, ProjectName, TypeTag};
pub use reference::Reference;
pub use result::Result;
