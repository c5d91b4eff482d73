//! Subcommand implementations and the file handling they share.

pub mod curve;
pub mod info;
pub mod rank;
pub mod restore;
pub mod select;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use nalgebra::Point3;
use vertex_restore::{
    Axis, AxisLocks, BlendConfiguration, BlendMode, CurvePoint, EditSession, EvalReference, Mesh,
};

use crate::{BlendArgs, ModeArg};

/// Load a mesh from a JSON file.
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read mesh from {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse mesh JSON in {:?}", path))
}

/// Write a mesh as pretty JSON.
pub fn save_mesh(mesh: &Mesh, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(mesh).context("Failed to serialize mesh")?;
    fs::write(path, text).with_context(|| format!("Failed to write mesh to {:?}", path))
}

/// Load both meshes and take the snapshot from the saved mesh's selection.
pub fn load_session(saved: &Path, live: &Path) -> Result<(EditSession, Mesh)> {
    let saved_mesh = load_mesh(saved)?;
    let live_mesh = load_mesh(live)?;

    let mut session = EditSession::new();
    session
        .save(&saved_mesh)
        .with_context(|| format!("Failed to save selection from {:?}", saved))?;
    Ok((session, live_mesh))
}

/// Parse an axis list such as "xz".
pub fn parse_axes(s: &str) -> Result<AxisLocks> {
    s.chars()
        .filter(|c| !matches!(c, ',' | ' '))
        .map(|c| match c.to_ascii_lowercase() {
            'x' => Ok(Axis::X),
            'y' => Ok(Axis::Y),
            'z' => Ok(Axis::Z),
            other => bail!("Unknown axis '{}' (expected x, y or z)", other),
        })
        .collect()
}

/// Build the blend configuration: the file (or defaults) first, then flags.
pub fn build_config(args: &BlendArgs) -> Result<BlendConfiguration> {
    let mut config = match &args.config {
        Some(path) => BlendConfiguration::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => BlendConfiguration::default(),
    };

    if let Some(mode) = args.mode {
        config.mode = match mode {
            ModeArg::Constant => BlendMode::Constant,
            ModeArg::Curve => BlendMode::Curve,
        };
    }
    if let Some(rate) = args.rate {
        config.constant_rate = rate;
    }
    if let Some(curve_rate) = args.curve_rate {
        config.curve_rate = curve_rate;
    }
    if let Some(roughness) = args.roughness {
        config = config.with_ui_roughness(roughness);
    }
    if !args.points.is_empty() {
        config.control_points = args.points.iter().copied().map(CurvePoint::from).collect();
    }
    if let Some(lock) = &args.lock {
        config.axis_locks = parse_axes(lock)?;
    }
    if let Some([x, y, z]) = args.reference {
        config.eval_reference = EvalReference::FixedPoint(Point3::new(x, y, z));
    }
    if args.change_hidden {
        config.change_hidden_vertices = true;
    }
    if args.full {
        config.force_full_restore = true;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blend_args() -> BlendArgs {
        BlendArgs {
            config: None,
            mode: None,
            rate: None,
            curve_rate: None,
            roughness: None,
            points: Vec::new(),
            lock: None,
            reference: None,
            change_hidden: false,
            full: false,
        }
    }

    #[test]
    fn test_parse_axes() {
        let locks = parse_axes("xZ").unwrap();
        assert!(locks.contains(Axis::X));
        assert!(!locks.contains(Axis::Y));
        assert!(locks.contains(Axis::Z));
        assert!(parse_axes("").unwrap().is_empty());
        assert!(parse_axes("w").is_err());
    }

    #[test]
    fn test_build_config_flags_override() {
        let mut args = blend_args();
        args.mode = Some(ModeArg::Curve);
        args.curve_rate = Some(2.0);
        args.roughness = Some(5.0);
        args.points = vec![(0.0, 1.0), (1.0, 0.0)];
        args.reference = Some([0.0, 0.0, 1.0]);

        let config = build_config(&args).unwrap();
        assert_eq!(config.mode, BlendMode::Curve);
        assert_eq!(config.curve_rate, 2.0);
        assert_eq!(config.roughness, 0.005);
        assert_eq!(config.control_points.len(), 2);
        assert_eq!(
            config.eval_reference,
            EvalReference::FixedPoint(Point3::new(0.0, 0.0, 1.0))
        );
    }

    #[test]
    fn test_build_config_rejects_bad_curve() {
        let mut args = blend_args();
        args.mode = Some(ModeArg::Curve);
        args.points = vec![(0.0, 0.0)];
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_build_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restore.toml");
        fs::write(&path, "mode = \"constant\"\nconstant_rate = 30\n").unwrap();

        let mut args = blend_args();
        args.config = Some(path);
        args.full = true;
        let config = build_config(&args).unwrap();
        assert_eq!(config.constant_rate, 30);
        assert!(config.force_full_restore);
    }

    #[test]
    fn test_mesh_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.json");
        let mut mesh = Mesh::from_positions([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        mesh.edges.push([0, 1]);
        save_mesh(&mesh, &path).unwrap();
        assert_eq!(load_mesh(&path).unwrap(), mesh);
    }

    #[test]
    fn test_load_session_requires_selection() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("saved.json");
        let live = dir.path().join("live.json");
        let mesh = Mesh::from_positions([[0.0, 0.0, 0.0]]);
        save_mesh(&mesh, &saved).unwrap();
        save_mesh(&mesh, &live).unwrap();
        assert!(load_session(&saved, &live).is_err());
    }
}
