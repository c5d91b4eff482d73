//! Blend configuration and file loading.
//!
//! A [`BlendConfiguration`] fully describes one restore: how the blend factor
//! is chosen, which axes are pinned to their saved values, how movement is
//! measured, and the falloff curve control points. Configurations can be
//! written as TOML or JSON.
//!
//! # Example TOML
//!
//! ```toml
//! mode = "curve"
//! curve_rate = 1.0
//! roughness = 0.001
//! axis_locks = ["z"]
//! change_hidden_vertices = false
//!
//! [eval_reference]
//! fixed_point = [0.0, 0.0, 0.0]
//!
//! [[control_points]]
//! x = 0.0
//! y = 0.0
//!
//! [[control_points]]
//! x = 1.0
//! y = 1.0
//! ```
//!
//! # Example
//!
//! ```
//! use vertex_restore::{BlendConfiguration, BlendMode};
//!
//! let config = BlendConfiguration::from_toml("mode = \"constant\"\nconstant_rate = 40").unwrap();
//! assert_eq!(config.mode, BlendMode::Constant);
//! assert_eq!(config.constant_rate, 40);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{RestoreError, RestoreResult};
use crate::falloff::{CurvePoint, validate_control_points};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest accepted `constant_rate`.
pub const MAX_CONSTANT_RATE: u8 = 100;

/// Accepted magnitude of `curve_rate`.
pub const MAX_CURVE_RATE: f64 = 100.0;

/// Divisor from the editor's roughness slider to engine units.
pub const UI_ROUGHNESS_SCALE: f64 = 1000.0;

/// How the blend factor is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// One factor for every vertex: `constant_rate / 100`.
    #[default]
    Constant,
    /// Per-vertex factor from the falloff table, indexed by movement rank.
    Curve,
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlendMode::Constant => write!(f, "constant"),
            BlendMode::Curve => write!(f, "curve"),
        }
    }
}

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a point.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Axes whose coordinate always takes the saved value.
///
/// Serialized as a list of axis names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Axis>", into = "Vec<Axis>")]
pub struct AxisLocks {
    locked: [bool; 3],
}

impl AxisLocks {
    /// No axis locked.
    pub fn none() -> Self {
        Self::default()
    }

    /// Lock one more axis.
    pub fn with(mut self, axis: Axis) -> Self {
        self.locked[axis.index()] = true;
        self
    }

    /// Set or clear the lock on an axis.
    pub fn set(&mut self, axis: Axis, locked: bool) {
        self.locked[axis.index()] = locked;
    }

    #[inline]
    pub fn contains(&self, axis: Axis) -> bool {
        self.locked[axis.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.locked.iter().any(|&l| l)
    }

    /// Locked axes in X, Y, Z order.
    pub fn iter(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(|&a| self.contains(a))
    }
}

impl FromIterator<Axis> for AxisLocks {
    fn from_iter<I: IntoIterator<Item = Axis>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), AxisLocks::with)
    }
}

impl From<Vec<Axis>> for AxisLocks {
    fn from(axes: Vec<Axis>) -> Self {
        axes.into_iter().collect()
    }
}

impl From<AxisLocks> for Vec<Axis> {
    fn from(locks: AxisLocks) -> Self {
        locks.iter().collect()
    }
}

/// What movement magnitude is measured against when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalReference {
    /// Distance from each vertex's saved position to its live position.
    #[default]
    Default,
    /// Distance from a fixed point (such as the editor's 3D cursor) to the live position.
    FixedPoint(Point3<f64>),
}

impl EvalReference {
    /// The fixed point, if any.
    pub fn point(&self) -> Option<&Point3<f64>> {
        match self {
            EvalReference::Default => None,
            EvalReference::FixedPoint(p) => Some(p),
        }
    }
}

/// Parameters for one restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfiguration {
    pub mode: BlendMode,

    /// Percentage toward the saved position in constant mode, 0 to 100.
    pub constant_rate: u8,

    /// Multiplier applied to every falloff sample in curve mode.
    pub curve_rate: f64,

    /// Magnitudes closer than this share a rank. Engine units.
    pub roughness: f64,

    pub axis_locks: AxisLocks,

    pub eval_reference: EvalReference,

    /// When false, hidden vertices snap straight back to their saved position.
    pub change_hidden_vertices: bool,

    /// Ignore the factor and restore every axis.
    pub force_full_restore: bool,

    /// Falloff curve as sampled from the curve widget.
    pub control_points: Vec<CurvePoint>,
}

impl Default for BlendConfiguration {
    fn default() -> Self {
        Self {
            mode: BlendMode::Constant,
            constant_rate: 0,
            curve_rate: 1.0,
            roughness: 0.0,
            axis_locks: AxisLocks::none(),
            eval_reference: EvalReference::Default,
            change_hidden_vertices: false,
            force_full_restore: false,
            control_points: CurvePoint::linear(),
        }
    }
}

impl BlendConfiguration {
    /// Constant mode at rate 0, which moves nothing.
    pub fn safe_default() -> Self {
        Self::default()
    }

    /// Constant mode at the given rate.
    pub fn constant(rate: u8) -> Self {
        Self {
            mode: BlendMode::Constant,
            constant_rate: rate,
            ..Self::default()
        }
    }

    /// Curve mode with the given rate multiplier and control points.
    pub fn curve(curve_rate: f64, control_points: Vec<CurvePoint>) -> Self {
        Self {
            mode: BlendMode::Curve,
            curve_rate,
            control_points,
            ..Self::default()
        }
    }

    pub fn with_roughness(mut self, roughness: f64) -> Self {
        self.roughness = roughness;
        self
    }

    /// Set roughness from the editor slider value, which is in thousandths.
    pub fn with_ui_roughness(mut self, ui_roughness: f64) -> Self {
        self.roughness = ui_roughness / UI_ROUGHNESS_SCALE;
        self
    }

    pub fn with_axis_locks(mut self, locks: AxisLocks) -> Self {
        self.axis_locks = locks;
        self
    }

    pub fn with_reference(mut self, reference: EvalReference) -> Self {
        self.eval_reference = reference;
        self
    }

    pub fn with_hidden_vertices(mut self, change_hidden: bool) -> Self {
        self.change_hidden_vertices = change_hidden;
        self
    }

    pub fn with_full_restore(mut self, force: bool) -> Self {
        self.force_full_restore = force;
        self
    }

    /// Put mode and rate back to constant 0. Other fields are left alone.
    pub fn reset_to_safe_default(&mut self) {
        self.mode = BlendMode::Constant;
        self.constant_rate = 0;
    }

    /// Whether mode and rate are at the safe default.
    pub fn is_safe_default(&self) -> bool {
        self.mode == BlendMode::Constant && self.constant_rate == 0
    }

    /// Check every field is in range.
    ///
    /// Control points are only checked in curve mode.
    pub fn validate(&self) -> RestoreResult<()> {
        if self.constant_rate > MAX_CONSTANT_RATE {
            return Err(RestoreError::invalid_config(
                "constant_rate",
                format!("must be at most {}, got {}", MAX_CONSTANT_RATE, self.constant_rate),
            ));
        }
        if !self.curve_rate.is_finite() || self.curve_rate.abs() > MAX_CURVE_RATE {
            return Err(RestoreError::invalid_config(
                "curve_rate",
                format!("must be within [-100, 100], got {}", self.curve_rate),
            ));
        }
        if !self.roughness.is_finite() || self.roughness < 0.0 {
            return Err(RestoreError::invalid_config(
                "roughness",
                format!("must be finite and non-negative, got {}", self.roughness),
            ));
        }
        let reference_finite = self
            .eval_reference
            .point()
            .is_none_or(|p| p.coords.iter().all(|c| c.is_finite()));
        if !reference_finite {
            return Err(RestoreError::invalid_config(
                "eval_reference",
                "fixed point must be finite",
            ));
        }
        if self.mode == BlendMode::Curve {
            validate_control_points(&self.control_points)?;
        }
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration from a file, picking the format by extension.
    ///
    /// `.json` is read as JSON, everything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            let contents = std::fs::read_to_string(path)?;
            Ok(Self::from_json(&contents)?)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Serialize to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Write configuration as TOML.
    pub fn save_toml(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let toml_str = self.to_toml()?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Errors from reading or writing configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
