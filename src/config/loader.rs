//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SatchelConfig;
use crate::domain::errors::SatchelError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SatchelConfig
/// 4. Applies environment variable overrides (SATCHEL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use satchel::config::loader::load_config;
///
/// let config = load_config("satchel.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SatchelConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SatchelError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SatchelError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SatchelConfig = toml::from_str(&contents)
        .map_err(|e| SatchelError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SatchelError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SatchelError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SatchelError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using SATCHEL_* prefix
///
/// Environment variables follow the pattern: SATCHEL_<SECTION>_<KEY>
/// For example: SATCHEL_STORAGE_ROOT, SATCHEL_EXPORT_OUTPUT_DIR
fn apply_env_overrides(config: &mut SatchelConfig) {
    if let Ok(val) = std::env::var("SATCHEL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("SATCHEL_STORAGE_ROOT") {
        config.storage.root = val;
    }

    if let Ok(val) = std::env::var("SATCHEL_EXPORT_WORKSPACE_ROOT") {
        config.export.workspace_root = val;
    }
    if let Ok(val) = std::env::var("SATCHEL_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("SATCHEL_EXPORT_KEEP_WORKSPACE") {
        config.export.keep_workspace = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SATCHEL_EXPORT_EXCLUDED_TYPES") {
        config.export.excluded_types = split_list(&val);
    }

    if let Ok(val) = std::env::var("SATCHEL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("SATCHEL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("SATCHEL_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("SATCHEL_TEST_ROOT_VAR", "/srv/store");
        let input = "root = \"${SATCHEL_TEST_ROOT_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "root = \"/srv/store\"\n");
        std::env::remove_var("SATCHEL_TEST_ROOT_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("SATCHEL_MISSING_VAR");
        let input = "root = \"${SATCHEL_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("SATCHEL_MISSING_VAR"));
    }

    #[test]
    fn test_comments_are_not_substituted() {
        std::env::remove_var("SATCHEL_COMMENTED_VAR");
        let input = "# root = \"${SATCHEL_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("Cortex, Cap ,,ValueWrapper"),
            vec!["Cortex", "Cap", "ValueWrapper"]
        );
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[storage]
root = "/data/projects"

[export]
output_dir = "/data/exports"
excluded_types = ["Cortex"]

[formats]
zip = ["TimeSeries", "Connectivity"]
native = []
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.storage.root, "/data/projects");
        assert_eq!(config.export.output_dir, "/data/exports");
        assert_eq!(config.export.excluded_types, vec!["Cortex".to_string()]);
        assert_eq!(config.formats.zip.len(), 2);
        assert!(config.formats.native.is_empty());
        assert_eq!(config.formats.linked_zip, vec!["*".to_string()]);
    }
}
