//! Configuration management for Satchel.
//!
//! Satchel uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SATCHEL_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`StorageConfig`] - Location of the artifact store
//! - [`ExportConfig`] - Workspace, output directory, excluded type tags
//! - [`FormatsConfig`] - Type tags handled by each export format
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [storage]
//! root = "${SATCHEL_STORE}"
//!
//! [export]
//! workspace_root = "/tmp/satchel"
//! output_dir = "./exports"
//! excluded_types = ["Cortex", "CortexActivity"]
//!
//! [formats]
//! zip = ["*"]
//! linked_zip = ["TimeSeries", "Connectivity"]
//! native = []
//! ```
//!
//! ```rust,no_run
//! use satchel::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("satchel.toml")?;
//! println!("Store: {}", config.storage.root);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ExportConfig, FormatsConfig, LoggingConfig, SatchelConfig, StorageConfig,
    ALL_TYPES, DEFAULT_EXCLUDED_TYPES,
};
