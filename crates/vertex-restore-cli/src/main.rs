//! vrestore: Command-line interface for vertex snapshot and restore.
//!
//! Meshes are JSON files in the library's `Mesh` form. The selection stored in
//! a "saved" mesh file is the snapshot; a "live" mesh file is the edited state
//! that gets restored or re-selected.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=vertex_restore=info` - Operation summaries
//! - `RUST_LOG=vertex_restore=debug` - Snapshot and selection detail
//! - `RUST_LOG=vertex_restore::timing=debug` - Performance timing
//!
//! # Example
//!
//! ```bash
//! # Pull every saved vertex halfway back
//! vrestore restore --saved before.json --live after.json --rate 50 -o out.json
//!
//! # Curve mode from a configuration file
//! RUST_LOG=vertex_restore=info vrestore restore --saved before.json --live after.json \
//!     --config restore.toml -o out.json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{curve, info, rank, restore, select};

/// vrestore - Save mesh vertices and blend them back toward where they were.
#[derive(Parser)]
#[command(name = "vrestore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Same factor for every vertex
    Constant,
    /// Factor from the falloff curve by movement rank
    Curve,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Select exactly the saved vertices
    Replace,
    /// Add saved vertices to the selection
    Union,
    /// Remove saved vertices from the selection
    Subtract,
    /// Flip the selection of saved vertices
    Difference,
}

/// Blend options shared by commands that restore or rank.
#[derive(clap::Args, Clone)]
pub struct BlendArgs {
    /// Blend configuration file (TOML, or JSON by extension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Blend mode
    #[arg(long)]
    mode: Option<ModeArg>,

    /// Constant-mode rate, 0 to 100 (percent toward the saved position)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    rate: Option<u8>,

    /// Curve-mode multiplier applied to the falloff curve
    #[arg(long, allow_negative_numbers = true)]
    curve_rate: Option<f64>,

    /// Magnitudes this close share a rank, in thousandths
    #[arg(long)]
    roughness: Option<f64>,

    /// Falloff control point as x,y (repeat for more points)
    #[arg(long = "point", value_parser = parse_curve_point)]
    points: Vec<(f64, f64)>,

    /// Lock axes to their saved values, e.g. "z" or "xy"
    #[arg(long)]
    lock: Option<String>,

    /// Measure movement from this point instead of the saved position (x,y,z)
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    reference: Option<[f64; 3]>,

    /// Blend hidden vertices too instead of snapping them back
    #[arg(long)]
    change_hidden: bool,

    /// Restore every axis regardless of rate
    #[arg(long)]
    full: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh statistics and selection
    Info {
        /// Input mesh file (JSON)
        input: PathBuf,
    },

    /// Rank saved vertices by how far they moved
    Rank {
        /// Mesh whose selection was saved
        #[arg(long)]
        saved: PathBuf,

        /// Edited mesh
        #[arg(long)]
        live: PathBuf,

        #[command(flatten)]
        blend: BlendArgs,

        /// Show only the N largest movers
        #[arg(long)]
        top: Option<usize>,
    },

    /// Blend saved vertices back toward their saved positions
    Restore {
        /// Mesh whose selection was saved
        #[arg(long)]
        saved: PathBuf,

        /// Edited mesh
        #[arg(long)]
        live: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        blend: BlendArgs,

        /// Time budget in milliseconds
        #[arg(long, default_value = "3000")]
        budget_ms: u64,
    },

    /// Re-apply the saved selection to the edited mesh
    Select {
        /// Mesh whose selection was saved
        #[arg(long)]
        saved: PathBuf,

        /// Edited mesh
        #[arg(long)]
        live: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// How the saved selection combines with the live one
        #[arg(long, default_value = "replace")]
        policy: PolicyArg,
    },

    /// Sample a falloff curve and print the table
    Curve {
        #[command(flatten)]
        blend: BlendArgs,

        /// Number of segments (table length is this plus 10)
        #[arg(long, default_value = "10")]
        segments: usize,
    },
}

fn parse_curve_point(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [x, y] => Ok((
            x.parse().map_err(|e| format!("invalid x '{}': {}", x, e))?,
            y.parse().map_err(|e| format!("invalid y '{}': {}", y, e))?,
        )),
        _ => Err(format!("expected x,y but got '{}'", s)),
    }
}

fn parse_point(s: &str) -> Result<[f64; 3], String> {
    let coords = s
        .split(',')
        .map(|c| {
            c.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid coordinate '{}': {}", c, e))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match coords.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(format!("expected x,y,z but got '{}'", s)),
    }
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "vertex_restore=info",
            2 => "vertex_restore=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    // Nicer panic reports in development
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Info { input } => info::run(input, &cli),
        Commands::Rank {
            saved,
            live,
            blend,
            top,
        } => rank::run(saved, live, blend, *top, &cli),
        Commands::Restore {
            saved,
            live,
            output,
            blend,
            budget_ms,
        } => restore::run(saved, live, output, blend, *budget_ms, &cli),
        Commands::Select {
            saved,
            live,
            output,
            policy,
        } => select::run(saved, live, output, *policy, &cli),
        Commands::Curve { blend, segments } => curve::run(blend, *segments, &cli),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(restore_err) = e.downcast_ref::<vertex_restore::RestoreError>() {
                eprintln!("{}: {}", "Error".red().bold(), restore_err);
                eprintln!("  {}: {}", "Code".cyan(), restore_err.code());
                eprintln!(
                    "  {}: {}",
                    "Suggestion".green(),
                    restore_err.recovery_suggestion()
                );
                if let Some(location) = restore_err.location() {
                    eprintln!("  {}: {}", "Location".yellow(), location);
                }
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_curve_point() {
        assert_eq!(parse_curve_point("0.5, 1"), Ok((0.5, 1.0)));
        assert!(parse_curve_point("0.5").is_err());
        assert!(parse_curve_point("a,b").is_err());
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1,-2,3.5"), Ok([1.0, -2.0, 3.5]));
        assert!(parse_point("1,2").is_err());
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "vrestore", "restore", "--saved", "a.json", "--live", "b.json", "-o", "c.json",
            "--mode", "curve", "--point", "0,0", "--point", "1,1", "--lock", "xz",
            "--reference", "-1,0,0",
        ])
        .unwrap();
        match cli.command {
            Commands::Restore { blend, .. } => {
                assert_eq!(blend.points.len(), 2);
                assert_eq!(blend.reference, Some([-1.0, 0.0, 0.0]));
            }
            _ => panic!("expected restore"),
        }
    }
}
