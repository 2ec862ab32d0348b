//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "satchel.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Satchel configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [storage] root at your artifact store");
                println!("     (or set SATCHEL_STORE in a .env file)");
                println!("  2. Validate configuration: satchel validate-config");
                println!("  3. List formats: satchel formats --gid <GID>");
                println!("  4. Run export: satchel export --gid <GID>");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Satchel Configuration File

[application]
log_level = "info"

[storage]
root = "${SATCHEL_STORE}"

[export]
output_dir = "./exports"

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Satchel Configuration File
# Packages stored artifacts, and everything they reference, into archives

[application]
# Log level: trace | debug | info | warn | error
log_level = "info"

[storage]
# Root of the artifact store: <root>/<project>/<operation_id>/<file>.json
# ${VAR} references are resolved from the environment (and .env)
root = "${SATCHEL_STORE}"

[export]
# One workspace per request is created below this directory
workspace_root = "/tmp/satchel"

# Finished archives are moved here
output_dir = "./exports"

# Keep the staged workspace after the archive is built (debugging)
keep_workspace = false

# Type tags no format may export
excluded_types = [
    "Cortex",
    "CortexActivity",
    "CapEEGActivity",
    "Cap",
    "ValueWrapper",
    "SpatioTermporalMask",
]

[formats]
# Type tags each format accepts; "*" accepts all, [] disables the format.
# When no --format is given, the first accepting format is used, in this
# order: linked_zip, zip, native.
linked_zip = ["*"]
zip = ["*"]
native = ["*"]

[logging]
# JSON log file with rotation: daily | hourly | never
local_enabled = true
local_path = "/var/log/satchel"
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SatchelConfig;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "satchel.toml".to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.output, "satchel.toml");
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_parse() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config: SatchelConfig = toml::from_str(&content).unwrap();
            assert!(config.validate().is_ok());
            assert_eq!(config.storage.root, "${SATCHEL_STORE}");
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("satchel.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().await.unwrap(), EXIT_OK);
        assert!(fs::read_to_string(&output)
            .unwrap()
            .contains("[storage]"));
    }
}
