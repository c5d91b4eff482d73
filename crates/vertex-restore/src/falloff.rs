//! Falloff curve sampling.
//!
//! The curve widget hands over a handful of `(x, y)` control points. Restoring
//! needs a dense positional lookup instead, so the curve is resampled onto an
//! even grid over `[0, 1]` with `segment_count + 10` entries. The extra ten
//! entries keep the lookup index `floor(len * rank) - 1` away from the last
//! slot even at `rank == 1.0`.

use crate::error::{RestoreError, RestoreResult};
use serde::{Deserialize, Serialize};

/// Extra table entries beyond the requested segment count.
pub const TABLE_HEADROOM: usize = 10;

/// One control point of a falloff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The identity ramp `(0, 0) -> (1, 1)`.
    pub fn linear() -> Vec<CurvePoint> {
        vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)]
    }
}

impl From<(f64, f64)> for CurvePoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Check that control points can be sampled.
pub fn validate_control_points(points: &[CurvePoint]) -> RestoreResult<()> {
    if points.len() < 2 {
        return Err(RestoreError::invalid_curve(format!(
            "need at least 2 control points, got {}",
            points.len()
        )));
    }
    if let Some(i) = points
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return Err(RestoreError::invalid_curve(format!(
            "control point {} is not finite",
            i
        )));
    }
    if let Some(i) = points.iter().position(|p| !(0.0..=1.0).contains(&p.x)) {
        return Err(RestoreError::invalid_curve(format!(
            "control point {} has x = {} outside [0, 1]",
            i, points[i].x
        )));
    }
    if let Some(i) = points.windows(2).position(|w| w[1].x < w[0].x) {
        return Err(RestoreError::invalid_curve(format!(
            "x decreases between control points {} and {}",
            i,
            i + 1
        )));
    }
    Ok(())
}

/// A dense resample of a falloff curve.
#[derive(Debug, Clone, PartialEq)]
pub struct FalloffTable {
    samples: Vec<f64>,
}

impl FalloffTable {
    /// Sample `points` onto `segment_count + 10` evenly spaced x values.
    ///
    /// Every y is scaled by `rate_multiplier`. Sampling is piecewise linear
    /// between control points with clamped ends.
    pub fn sample(
        points: &[CurvePoint],
        rate_multiplier: f64,
        segment_count: usize,
    ) -> RestoreResult<Self> {
        validate_control_points(points)?;

        let len = segment_count + TABLE_HEADROOM;
        let step = 1.0 / (len - 1) as f64;
        let samples = (0..len)
            .map(|j| interpolate(points, j as f64 * step) * rate_multiplier)
            .collect();

        Ok(Self { samples })
    }

    /// Sampled values in ascending x order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the table has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Table slot used for a rank position: `clamp(floor(len * rank) - 1, 0, len - 1)`.
    pub fn index_for(&self, rank_position: f64) -> usize {
        let last = self.samples.len().saturating_sub(1) as i64;
        let raw = (self.samples.len() as f64 * rank_position).floor() as i64 - 1;
        raw.clamp(0, last) as usize
    }

    /// Blend factor for a rank position.
    pub fn lookup(&self, rank_position: f64) -> f64 {
        self.samples
            .get(self.index_for(rank_position))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Piecewise-linear interpolation over validated control points.
fn interpolate(points: &[CurvePoint], x: f64) -> f64 {
    let first = points[0];
    let last = points[points.len() - 1];
    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }

    // First point strictly right of x; x is inside (first.x, last.x) so 1 <= k < len.
    let k = points.partition_point(|p| p.x <= x);
    let (a, b) = (points[k - 1], points[k]);
    let width = b.x - a.x;
    if width <= 0.0 {
        b.y
    } else {
        a.y + (b.y - a.y) * (x - a.x) / width
    }
}
