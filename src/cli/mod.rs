//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Satchel using clap.

pub mod commands;

use crate::core::export::TargetRef;
use crate::domain::{ExportError, Gid, GroupId, SatchelError, StoreError};
use clap::{Args, Parser, Subcommand};

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for unknown targets or targets no format accepts
pub const EXIT_NOT_EXPORTABLE: i32 = 3;
/// Exit code for everything else
pub const EXIT_FATAL: i32 = 5;

/// Satchel - artifact export archiver
#[derive(Parser, Debug)]
#[command(name = "satchel")]
#[command(version, about, long_about = None)]
#[command(author = "Satchel Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "satchel.toml", env = "SATCHEL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SATCHEL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export an artifact or group into an archive
    Export(commands::export::ExportArgs),

    /// List configured export formats
    Formats(commands::formats::FormatsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Selects an artifact by GID or a group by id
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct TargetArgs {
    /// GID of the artifact to export
    #[arg(long)]
    pub gid: Option<String>,

    /// Id of the artifact group to export
    #[arg(long)]
    pub group: Option<String>,
}

impl TargetArgs {
    /// The selected target, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the given identifier is blank.
    pub fn target(&self) -> anyhow::Result<Option<TargetRef>> {
        let target = match (&self.gid, &self.group) {
            (Some(gid), _) => Some(TargetRef::Artifact(
                Gid::new(gid.as_str()).map_err(anyhow::Error::msg)?,
            )),
            (None, Some(group)) => Some(TargetRef::Group(
                GroupId::new(group.as_str()).map_err(anyhow::Error::msg)?,
            )),
            (None, None) => None,
        };
        Ok(target)
    }
}

/// Process exit code for a failed command
pub fn exit_code_for(error: &SatchelError) -> i32 {
    match error {
        SatchelError::Configuration(_) => EXIT_CONFIG,
        SatchelError::Store(StoreError::ArtifactNotFound(_) | StoreError::GroupNotFound(_)) => {
            EXIT_NOT_EXPORTABLE
        }
        SatchelError::Export(ExportError::Unsupported { .. })
        | SatchelError::Export(ExportError::EmptyExportTarget(_))
        | SatchelError::Validation(_) => EXIT_NOT_EXPORTABLE,
        _ => EXIT_FATAL,
    }
}
