//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Satchel configuration file and the store it points at.

use crate::adapters::store::FilesystemStore;
use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Only check the file, without indexing the artifact store
    #[arg(long)]
    pub skip_store: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Store Root: {}", config.storage.root);
        println!("  Workspace Root: {}", config.export.workspace_root);
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  Keep Workspace: {}", config.export.keep_workspace);
        println!("  Excluded Types: {:?}", config.export.excluded_types);
        println!("  Zip Types: {:?}", config.formats.zip);
        println!("  Linked Zip Types: {:?}", config.formats.linked_zip);
        println!("  Native Types: {:?}", config.formats.native);
        println!();

        if self.skip_store {
            return Ok(EXIT_OK);
        }

        let root = config.storage.root.clone();
        match tokio::task::spawn_blocking(move || FilesystemStore::open(root)).await? {
            Ok(store) => {
                println!("✅ Store indexed: {} artifacts", store.len());
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Store could not be indexed");
                println!("   Error: {e}");
                Ok(EXIT_CONFIG)
            }
        }
    }
}
