//! vrestore curve command - sample a falloff curve into a lookup table.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use vertex_restore::{CurvePoint, FalloffTable};

use super::build_config;
use crate::{BlendArgs, Cli, OutputFormat, output};

#[derive(Serialize)]
struct CurveResult {
    control_points: Vec<CurvePoint>,
    curve_rate: f64,
    segments: usize,
    samples: Vec<f64>,
}

pub fn run(args: &BlendArgs, segments: usize, cli: &Cli) -> Result<()> {
    let config = build_config(args)?;
    let table = FalloffTable::sample(&config.control_points, config.curve_rate, segments)?;

    let result = CurveResult {
        control_points: config.control_points.clone(),
        curve_rate: config.curve_rate,
        segments,
        samples: table.samples().to_vec(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Falloff Table".bold().underline());
                println!("  {}: {}", "Control points".cyan(), result.control_points.len());
                println!("  {}: {}", "Rate".cyan(), result.curve_rate);
                println!("  {}: {}", "Length".cyan(), table.len());
                println!();
                let last = table.len().saturating_sub(1).max(1) as f64;
                for (i, sample) in result.samples.iter().enumerate() {
                    println!("  {:>6}  x={:<8.4} {:>10.6}", i, i as f64 / last, sample);
                }
            }
        }
    }

    Ok(())
}
