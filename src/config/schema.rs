//! Configuration schema types
//!
//! This module defines the configuration structure for Satchel.

use serde::{Deserialize, Serialize};

/// Type tags with no working export path
///
/// Spelling follows the tags found in existing stores.
pub const DEFAULT_EXCLUDED_TYPES: &[&str] = &[
    "Cortex",
    "CortexActivity",
    "CapEEGActivity",
    "Cap",
    "ValueWrapper",
    "SpatioTermporalMask",
];

/// Wildcard accepted in `[formats]` lists
pub const ALL_TYPES: &str = "*";

/// Main Satchel configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatchelConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Artifact store location
    pub storage: StorageConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Export formats and the type tags they handle
    #[serde(default)]
    pub formats: FormatsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SatchelConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate()?;
        self.export.validate()?;
        self.formats.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Artifact store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding one folder per project
    pub root: String,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root.trim().is_empty() {
            return Err("storage.root cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory under which one workspace per export request is created
    #[serde(default = "default_workspace_root")]
    pub workspace_root: String,

    /// Directory finished archives are moved to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Keep the staged workspace after a successful export
    #[serde(default)]
    pub keep_workspace: bool,

    /// Type tags no format may export
    #[serde(default = "default_excluded_types")]
    pub excluded_types: Vec<String>,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.workspace_root.trim().is_empty() {
            return Err("export.workspace_root cannot be empty".to_string());
        }
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        if let Some(empty) = self.excluded_types.iter().find(|t| t.trim().is_empty()) {
            return Err(format!(
                "export.excluded_types contains an empty type tag: '{empty}'"
            ));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            workspace_root: default_workspace_root(),
            output_dir: default_output_dir(),
            keep_workspace: false,
            excluded_types: default_excluded_types(),
        }
    }
}

/// Supported type tags per export format
///
/// `"*"` accepts every type tag; an empty list disables the format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatsConfig {
    #[serde(default = "default_all_types")]
    pub zip: Vec<String>,

    #[serde(default = "default_all_types")]
    pub linked_zip: Vec<String>,

    #[serde(default = "default_all_types")]
    pub native: Vec<String>,
}

impl FormatsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.zip.is_empty() && self.linked_zip.is_empty() && self.native.is_empty() {
            return Err("at least one export format must be enabled in [formats]".to_string());
        }

        for (name, types) in [
            ("zip", &self.zip),
            ("linked_zip", &self.linked_zip),
            ("native", &self.native),
        ] {
            if types.iter().any(|t| t.trim().is_empty()) {
                return Err(format!("formats.{name} contains an empty type tag"));
            }
            if types.len() > 1 && types.iter().any(|t| t == ALL_TYPES) {
                return Err(format!(
                    "formats.{name}: '{ALL_TYPES}' cannot be combined with explicit type tags"
                ));
            }
        }
        Ok(())
    }
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            zip: default_all_types(),
            linked_zip: default_all_types(),
            native: default_all_types(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_workspace_root() -> String {
    std::env::temp_dir()
        .join("satchel")
        .to_string_lossy()
        .into_owned()
}

fn default_output_dir() -> String {
    "./exports".to_string()
}

fn default_excluded_types() -> Vec<String> {
    DEFAULT_EXCLUDED_TYPES.iter().map(|s| s.to_string()).collect()
}

fn default_all_types() -> Vec<String> {
    vec![ALL_TYPES.to_string()]
}

fn default_local_path() -> String {
    "/var/log/satchel".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> SatchelConfig {
        toml::from_str(
            r#"
[storage]
root = "/data/projects"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = minimal();
        assert_eq!(config.application.log_level, "info");
        assert!(!config.export.keep_workspace);
        assert_eq!(config.export.output_dir, "./exports");
        assert_eq!(config.export.excluded_types.len(), 6);
        assert!(config
            .export
            .excluded_types
            .contains(&"SpatioTermporalMask".to_string()));
        assert_eq!(config.formats.zip, vec!["*".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_root_required() {
        let mut config = minimal();
        config.storage.root = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_formats_validation() {
        let mut formats = FormatsConfig::default();
        assert!(formats.validate().is_ok());

        formats.zip = vec!["*".to_string(), "TimeSeries".to_string()];
        assert!(formats.validate().is_err());

        formats.zip = vec!["TimeSeries".to_string(), "".to_string()];
        assert!(formats.validate().is_err());

        formats.zip = vec![];
        formats.linked_zip = vec![];
        formats.native = vec![];
        assert!(formats.validate().is_err());

        formats.native = vec!["Connectivity".to_string()];
        assert!(formats.validate().is_ok());
    }

    #[test]
    fn test_export_config_rejects_empty_exclusion() {
        let mut export = ExportConfig::default();
        export.excluded_types.push(" ".to_string());
        assert!(export.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_path = String::new();
        assert!(config.validate().is_err());

        config.local_enabled = false;
        assert!(config.validate().is_ok());
    }
}
