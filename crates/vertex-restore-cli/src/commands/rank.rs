//! vrestore rank command - show how far each saved vertex moved.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use vertex_restore::{BlendMode, FalloffTable, MeshAccess, blend, rank_movement};

use super::{build_config, load_session};
use crate::{BlendArgs, Cli, OutputFormat, output};

#[derive(Serialize)]
struct RankRow {
    index: u32,
    magnitude: f64,
    rank: f64,
    factor: f64,
}

#[derive(Serialize)]
struct RankResult {
    mode: String,
    saved: usize,
    moved: usize,
    roughness: f64,
    rows: Vec<RankRow>,
}

pub fn run(
    saved: &Path,
    live: &Path,
    args: &BlendArgs,
    top: Option<usize>,
    cli: &Cli,
) -> Result<()> {
    let (session, mesh) = load_session(saved, live)?;
    let config = build_config(args)?;

    let snapshot = session
        .snapshot()
        .context("Session holds no snapshot after saving")?;
    snapshot.check_structure(mesh.vertex_count())?;

    let ranked = rank_movement(
        snapshot.records(),
        |record| {
            mesh.vertex(record.index)
                .map_or(record.saved_position, |v| v.position)
        },
        config.roughness,
        config.eval_reference.point(),
    );

    let table = match config.mode {
        BlendMode::Curve => Some(FalloffTable::sample(
            &config.control_points,
            config.curve_rate,
            snapshot.len(),
        )?),
        BlendMode::Constant => None,
    };

    let mut rows = ranked
        .iter()
        .map(|r| -> Result<RankRow> {
            Ok(RankRow {
                index: r.index,
                magnitude: r.magnitude,
                rank: r.rank_position,
                factor: blend::factor(&config, Some(r.rank_position), table.as_ref())?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    rows.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude).then(a.index.cmp(&b.index)));

    let moved = rows.iter().filter(|r| r.magnitude > 0.0).count();
    if let Some(n) = top {
        rows.truncate(n);
    }

    let result = RankResult {
        mode: config.mode.to_string(),
        saved: snapshot.len(),
        moved,
        roughness: config.roughness,
        rows,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Movement Ranking".bold().underline());
                println!("  {}: {}", "Mode".cyan(), result.mode);
                println!("  {}: {}", "Saved".cyan(), result.saved);
                println!("  {}: {}", "Moved".cyan(), result.moved);
                println!();
                println!(
                    "  {:>8}  {:>12}  {:>8}  {:>8}",
                    "Index".bold(),
                    "Distance".bold(),
                    "Rank".bold(),
                    "Factor".bold()
                );
                for row in &result.rows {
                    println!(
                        "  {:>8}  {:>12.6}  {:>8.4}  {:>8.4}",
                        row.index, row.magnitude, row.rank, row.factor
                    );
                }
            }
        }
    }

    Ok(())
}
