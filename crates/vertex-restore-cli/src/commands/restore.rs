//! vrestore restore command - blend saved vertices back toward their saved positions.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use super::{build_config, load_session, save_mesh};
use crate::{BlendArgs, Cli, OutputFormat, output};

#[derive(Serialize)]
struct RestoreSummary {
    input: String,
    output: String,
    mode: String,
    saved: usize,
    written: usize,
    hidden_restored: usize,
    max_displacement: f64,
    elapsed_ms: u128,
}

pub fn run(
    saved: &Path,
    live: &Path,
    output_path: &Path,
    args: &BlendArgs,
    budget_ms: u64,
    cli: &Cli,
) -> Result<()> {
    let (session, mut mesh) = load_session(saved, live)?;
    let session = session.with_budget(Duration::from_millis(budget_ms));
    let mut config = build_config(args)?;

    info!(
        saved = session.saved_count(),
        mode = %config.mode,
        "Restoring {:?}",
        live
    );

    let report = match session.restore(&mut mesh, &mut config) {
        Ok(report) => report,
        Err(err) => {
            // Vertices written before a timeout keep their blended position.
            if err.resets_configuration() {
                save_mesh(&mesh, output_path)?;
                output::warning(
                    &format!(
                        "Partially restored mesh written to {:?}; configuration reset to {} rate {}",
                        output_path, config.mode, config.constant_rate
                    ),
                    cli.format,
                    cli.quiet,
                );
            }
            return Err(err.into());
        }
    };

    save_mesh(&mesh, output_path)?;

    let result = RestoreSummary {
        input: live.display().to_string(),
        output: output_path.display().to_string(),
        mode: report.mode.to_string(),
        saved: session.saved_count(),
        written: report.written,
        hidden_restored: report.hidden_restored,
        max_displacement: report.max_displacement,
        elapsed_ms: report.elapsed.as_millis(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Restore Results".bold().underline());
                println!("  {}: {}", "Mode".cyan(), result.mode);
                println!("  {}: {}", "Written".cyan(), result.written);
                if result.hidden_restored > 0 {
                    println!(
                        "  {}: {}",
                        "Hidden (snapped back)".cyan(),
                        result.hidden_restored
                    );
                }
                println!(
                    "  {}: {:.6}",
                    "Max displacement".cyan(),
                    result.max_displacement
                );
                println!("  {}: {} ms", "Elapsed".cyan(), result.elapsed_ms);
                println!();
                output::success(
                    &format!("Saved to {}", output_path.display()),
                    cli.format,
                    cli.quiet,
                );
            }
        }
    }

    Ok(())
}
