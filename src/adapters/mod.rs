//! External system integrations for Satchel.
//!
//! - [`locator`] - Trait seam between the export core and artifact storage
//! - [`store`] - Filesystem implementation of that seam
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate storage details from the
//! export core. Any store that can look artifacts up by GID, list group members
//! and open backing files can be exported from.
//!
//! ```rust,no_run
//! use satchel::adapters::locator::ArtifactLocator;
//! use satchel::adapters::store::FilesystemStore;
//! use satchel::domain::Gid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FilesystemStore::open("/var/lib/satchel/projects")?;
//! let artifact = store.load_by_gid(&Gid::new("sim-001")?)?;
//! println!("{}", store.path_for_stored_artifact(&artifact)?.display());
//! # Ok(())
//! # }
//! ```

pub mod locator;
pub mod store;
