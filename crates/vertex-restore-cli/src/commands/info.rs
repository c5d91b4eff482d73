//! vrestore info command - display mesh statistics and selection.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::load_mesh;
use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct MeshInfo {
    path: String,
    vertices: usize,
    edges: usize,
    selected: usize,
    hidden: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
}

#[derive(Serialize)]
struct BoundsInfo {
    min: [f64; 3],
    max: [f64; 3],
    dimensions: [f64; 3],
}

pub fn run(input: &Path, cli: &Cli) -> Result<()> {
    let mesh = load_mesh(input)?;

    let bounds = mesh.bounds().map(|(min, max)| {
        let dims = max - min;
        BoundsInfo {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
            dimensions: [dims.x, dims.y, dims.z],
        }
    });

    let info = MeshInfo {
        path: input.display().to_string(),
        vertices: mesh.vertex_count(),
        edges: mesh.edges.len(),
        selected: mesh.vertices.iter().filter(|v| v.selected).count(),
        hidden: mesh.vertices.iter().filter(|v| v.hidden).count(),
        bounds,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Mesh Information".bold().underline());
                println!("  {}: {}", "File".cyan(), input.display());
                println!("  {}: {}", "Vertices".cyan(), info.vertices);
                println!("  {}: {}", "Edges".cyan(), info.edges);
                println!("  {}: {}", "Selected".cyan(), info.selected);
                println!("  {}: {}", "Hidden".cyan(), info.hidden);

                if let Some(ref b) = info.bounds {
                    println!();
                    println!("{}", "Bounding Box".bold());
                    println!(
                        "  {}: [{:.4}, {:.4}, {:.4}]",
                        "Min".cyan(),
                        b.min[0],
                        b.min[1],
                        b.min[2]
                    );
                    println!(
                        "  {}: [{:.4}, {:.4}, {:.4}]",
                        "Max".cyan(),
                        b.max[0],
                        b.max[1],
                        b.max[2]
                    );
                    println!(
                        "  {}: {:.4} x {:.4} x {:.4}",
                        "Size".cyan(),
                        b.dimensions[0],
                        b.dimensions[1],
                        b.dimensions[2]
                    );
                }

                if info.selected == 0 {
                    println!();
                    output::warning(
                        "Nothing is selected; this mesh cannot be used as --saved",
                        cli.format,
                        cli.quiet,
                    );
                }
            }
        }
    }

    Ok(())
}
