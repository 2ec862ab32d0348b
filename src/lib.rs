// Satchel - Artifact Export Archiver
// Copyright (c) 2025 Satchel Contributors
// Licensed under the MIT License

//! # Satchel - Artifact Export Archiver
//!
//! Satchel packages stored data artifacts, alone or as a homogeneous group,
//! into a single downloadable archive. Artifacts the export target references,
//! directly or transitively, are bundled alongside it exactly once.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** the effective artifact of a possibly grouped export target
//! - **Walking** the reference graph and staging every reached artifact once
//! - **Archiving** the staged tree into a deterministic zip file
//!
//! ## Architecture
//!
//! Satchel follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export formats, staging, archiving, verification)
//! - [`adapters`] - Artifact lookup traits and the filesystem store
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use satchel::config::load_config;
//! use satchel::core::export::{ExportCoordinator, TargetRef};
//! use satchel::domain::GroupId;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("satchel.toml")?;
//!     let coordinator = ExportCoordinator::new(&config)?;
//!
//!     let target = TargetRef::Group(GroupId::new("grp-7")?);
//!     let report = coordinator.execute_export(&target, Some("LinkedZipExporter"))?;
//!
//!     println!("Exported {} artifacts to {}", report.members, report.path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Archive Layout
//!
//! Every staged folder appears under an `Operation_` prefix. Linked artifacts
//! are gathered in the workspace's `Links` folder, which therefore shows up as
//! `Operation_Links/`:
//!
//! ```text
//! 2024-03-01_10-15_TimeSeries.zip
//! ├── Operation_12/...
//! └── Operation_Links/
//!     ├── Connectivity_conn-1.json
//!     └── Surface_srf-1.json
//! ```
//!
//! ## Error Handling
//!
//! Satchel uses the [`domain::SatchelError`] type for all errors; export
//! failures carry an [`domain::ExportError`] kind:
//!
//! ```rust,no_run
//! use satchel::domain::SatchelError;
//!
//! fn example() -> Result<(), SatchelError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = satchel::config::load_config("satchel.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Satchel uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export");
//! warn!(gid = "sim-001", "Reference could not be resolved");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
