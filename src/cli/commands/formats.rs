//! Formats command implementation
//!
//! Lists the configured export formats and, for a given target, which of them
//! would accept it.

use crate::cli::{exit_code_for, TargetArgs, EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use crate::core::export::ExportCoordinator;
use crate::domain::ExportTarget;
use clap::Args;

/// Arguments for the formats command
#[derive(Args, Debug)]
pub struct FormatsArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl FormatsArgs {
    /// Execute the formats command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let target = self.target.target()?;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let listing = tokio::task::spawn_blocking(move || {
            let coordinator = ExportCoordinator::new(&config)?;
            let resolved = match &target {
                Some(target) => Some(coordinator.resolve_target(target)?.0),
                None => None,
            };
            Ok::<_, crate::domain::SatchelError>(describe(&coordinator, resolved.as_ref()))
        })
        .await?;

        match listing {
            Ok(lines) => {
                for line in lines {
                    println!("{line}");
                }
                Ok(EXIT_OK)
            }
            Err(e) => {
                eprintln!("❌ {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

/// One block of output lines per configured format
fn describe(coordinator: &ExportCoordinator, target: Option<&ExportTarget>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(target) = target {
        lines.push(format!("Formats for {target}:"));
    } else {
        lines.push("Configured export formats:".to_string());
    }

    for exporter in coordinator.registry().iter() {
        lines.push(format!("  {} ({})", exporter.label(), exporter.name()));
        lines.push(format!("    Types: {}", exporter.supported_types()));
        lines.push(format!(
            "    Groups: {}",
            if exporter.skips_group_exports() {
                "no"
            } else {
                "yes"
            }
        ));

        if let Some(target) = target {
            let accepted = exporter.accepts(target);
            lines.push(format!("    Accepts: {}", if accepted { "yes" } else { "no" }));
            if accepted {
                if let Some(effective) = exporter.resolve_effective_type(target) {
                    lines.push(format!(
                        "    File name: {}",
                        exporter.export_file_name(&effective)
                    ));
                }
            }
        }
    }
    lines
}
