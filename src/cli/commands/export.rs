//! Export command implementation
//!
//! This module implements the `export` command, which packages one artifact
//! or artifact group into an archive in the configured output directory.

use crate::cli::{exit_code_for, TargetArgs, EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportReport};
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Export format to use (defaults to the first format accepting the target)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let Some(target) = self.target.target()? else {
            eprintln!("Nothing to export: pass --gid <GID> or --group <GROUP>");
            return Ok(EXIT_CONFIG);
        };

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if !self.yes {
            println!("Export Request:");
            println!("  Target: {target}");
            println!(
                "  Format: {}",
                self.format.as_deref().unwrap_or("first accepting format")
            );
            println!("  Store: {}", config.storage.root);
            println!("  Output: {}", config.export.output_dir);
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(EXIT_OK);
            }
        }

        println!("📦 Starting export...");

        // Indexing and exporting are plain blocking file I/O
        let format = self.format.clone();
        let result = tokio::task::spawn_blocking(move || {
            let coordinator = ExportCoordinator::new(&config)?;
            coordinator.execute_export(&target, format.as_deref())
        })
        .await?;

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("❌ Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_report(&report);
        Ok(EXIT_OK)
    }
}

fn print_report(report: &ExportReport) {
    println!();
    println!("📊 Export Summary:");
    println!("  Target: {}", report.target);
    println!("  Format: {} ({})", report.label, report.format);
    println!("  File: {}", report.path.display());
    println!("  Size: {}", report.human_size());
    println!("  SHA-256: {}", report.sha256);
    println!("  Members: {}", report.members);
    println!("  Linked artifacts: {}", report.links_staged);
    println!("  Duration: {:.2}s", report.duration.as_secs_f64());
    if !report.deletable {
        println!("  Note: this is the stored file itself; do not delete it");
    }
    println!();
    println!("✅ Export completed successfully!");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs {
            target: TargetArgs::default(),
            format: None,
            yes: false,
        };

        assert!(!args.yes);
        assert!(args.format.is_none());
        assert!(args.target.target().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_export_without_target_is_config_error() {
        let args = ExportArgs {
            target: TargetArgs::default(),
            format: None,
            yes: true,
        };
        assert_eq!(args.execute("missing.toml").await.unwrap(), EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_export_with_missing_config_is_config_error() {
        let args = ExportArgs {
            target: TargetArgs {
                gid: Some("sim-001".to_string()),
                group: None,
            },
            format: None,
            yes: true,
        };
        assert_eq!(
            args.execute("/definitely/not/here/satchel.toml").await.unwrap(),
            EXIT_CONFIG
        );
    }
}
