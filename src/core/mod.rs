//! Core business logic for Satchel.
//!
//! # Modules
//!
//! - [`export`] - Exporter formats, reference walking, staging and archiving
//! - [`verification`] - Checksums and archive read-back
//!
//! # Export Workflow
//!
//! 1. **Resolve**: Look up the artifact or group and its project
//! 2. **Select**: Pick the requested format, or the first one that accepts the target
//! 3. **Walk**: Follow references and stage them under `Links` (linked formats only)
//! 4. **Stage**: Copy each member's operation folder into a fresh workspace
//! 5. **Archive**: Zip the staged folders as `Operation_<name>/...`
//! 6. **Deliver**: Checksum the archive and move it to the output directory
//!
//! # Example
//!
//! ```rust,no_run
//! use satchel::config::load_config;
//! use satchel::core::export::{ExportCoordinator, TargetRef};
//! use satchel::domain::Gid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("satchel.toml")?;
//! let coordinator = ExportCoordinator::new(&config)?;
//!
//! let target = TargetRef::Artifact(Gid::new("sim-001")?);
//! let report = coordinator.execute_export(&target, None)?;
//!
//! println!("Archive: {}", report.path.display());
//! println!("SHA-256: {}", report.sha256);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod verification;
