//! vrestore select command - re-apply the saved selection.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use vertex_restore::SelectionPolicy;

use super::{load_session, save_mesh};
use crate::{Cli, OutputFormat, PolicyArg, output};

#[derive(Serialize)]
struct SelectResult {
    output: String,
    policy: SelectionPolicy,
    saved: usize,
    changed: usize,
    selected: usize,
}

impl From<PolicyArg> for SelectionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Replace => SelectionPolicy::Replace,
            PolicyArg::Union => SelectionPolicy::Union,
            PolicyArg::Subtract => SelectionPolicy::Subtract,
            PolicyArg::Difference => SelectionPolicy::SymmetricDifference,
        }
    }
}

pub fn run(
    saved: &Path,
    live: &Path,
    output_path: &Path,
    policy: PolicyArg,
    cli: &Cli,
) -> Result<()> {
    let (session, mut mesh) = load_session(saved, live)?;
    let outcome = session.select_saved(&mut mesh, policy.into())?;
    save_mesh(&mesh, output_path)?;

    let result = SelectResult {
        output: output_path.display().to_string(),
        policy: outcome.policy,
        saved: session.saved_count(),
        changed: outcome.changed,
        selected: outcome.selected,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Selection Results".bold().underline());
                println!("  {}: {}", "Policy".cyan(), result.policy);
                println!("  {}: {}", "Saved".cyan(), result.saved);
                println!("  {}: {}", "Changed".cyan(), result.changed);
                println!("  {}: {}", "Selected".cyan(), result.selected);
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
