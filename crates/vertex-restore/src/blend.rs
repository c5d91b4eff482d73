//! Blend resolution: how far each saved vertex moves back.
//!
//! A blend factor of `0.0` keeps the live position and `1.0` puts the vertex
//! back on its saved position. Values in between interpolate per axis; curve
//! mode may produce values outside `[0, 1]`, which extrapolate.
//!
//! Before the factor is applied:
//! - hidden vertices go straight back to their saved position unless
//!   `change_hidden_vertices` is set,
//! - locked axes, or every axis under `force_full_restore`, take the saved
//!   coordinate.

use crate::config::{Axis, BlendConfiguration, BlendMode};
use crate::error::{RestoreError, RestoreResult};
use crate::falloff::FalloffTable;
use crate::mesh::LiveVertex;
use crate::rank::{RankMap, rank_movement};
use crate::snapshot::VertexRecord;
use nalgebra::Point3;
use std::collections::HashMap;

/// Factor for constant mode.
#[inline]
pub fn constant_factor(rate: u8) -> f64 {
    f64::from(rate) / 100.0
}

/// Blend factor for one vertex.
///
/// Curve mode needs a falloff table; a missing rank counts as `0.0`.
pub fn factor(
    config: &BlendConfiguration,
    rank_position: Option<f64>,
    table: Option<&FalloffTable>,
) -> RestoreResult<f64> {
    match config.mode {
        BlendMode::Constant => Ok(constant_factor(config.constant_rate)),
        BlendMode::Curve => {
            let table = table.ok_or_else(|| {
                RestoreError::invalid_curve("curve mode needs a sampled falloff table")
            })?;
            Ok(table.lookup(rank_position.unwrap_or(0.0)))
        }
    }
}

/// Move `live` toward `saved` by `factor`.
///
/// Exact at both ends: `0.0` returns `live`, `1.0` returns `saved`.
#[inline]
pub fn interpolate(saved: &Point3<f64>, live: &Point3<f64>, factor: f64) -> Point3<f64> {
    Point3::from(live.coords * (1.0 - factor) + saved.coords * factor)
}

/// Target position for one saved vertex. Does not write anything.
pub fn resolve(
    record: &VertexRecord,
    live: &LiveVertex,
    config: &BlendConfiguration,
    rank_position: Option<f64>,
    table: Option<&FalloffTable>,
) -> RestoreResult<Point3<f64>> {
    if live.hidden && !config.change_hidden_vertices {
        return Ok(record.saved_position);
    }
    let factor = factor(config, rank_position, table)?;
    Ok(apply_factor(record, live, config, factor))
}

fn apply_factor(
    record: &VertexRecord,
    live: &LiveVertex,
    config: &BlendConfiguration,
    factor: f64,
) -> Point3<f64> {
    let saved = &record.saved_position;
    let mut out = interpolate(saved, &live.position, factor);
    for axis in Axis::ALL {
        if config.force_full_restore || config.axis_locks.contains(axis) {
            out[axis.index()] = saved[axis.index()];
        }
    }
    out
}

/// Ranks and falloff table prepared once for a whole restore.
#[derive(Debug, Clone)]
pub struct BlendPlan {
    config: BlendConfiguration,
    curve: Option<(FalloffTable, RankMap)>,
}

impl BlendPlan {
    /// Prepare a restore over a working set of `(record, live vertex)` pairs.
    ///
    /// In curve mode this ranks the working set and samples the falloff curve
    /// with one segment per saved vertex.
    pub fn build(
        config: &BlendConfiguration,
        working_set: &[(VertexRecord, LiveVertex)],
    ) -> RestoreResult<Self> {
        let curve = match config.mode {
            BlendMode::Constant => None,
            BlendMode::Curve => {
                let table = FalloffTable::sample(
                    &config.control_points,
                    config.curve_rate,
                    working_set.len(),
                )?;
                let records: Vec<VertexRecord> = working_set.iter().map(|(r, _)| *r).collect();
                let live: HashMap<u32, Point3<f64>> = working_set
                    .iter()
                    .map(|(r, l)| (r.index, l.position))
                    .collect();
                let ranked = rank_movement(
                    &records,
                    |r| live.get(&r.index).copied().unwrap_or(r.saved_position),
                    config.roughness,
                    config.eval_reference.point(),
                );
                Some((table, RankMap::from(ranked)))
            }
        };

        Ok(Self {
            config: config.clone(),
            curve,
        })
    }

    pub fn config(&self) -> &BlendConfiguration {
        &self.config
    }

    /// Falloff table, in curve mode.
    pub fn table(&self) -> Option<&FalloffTable> {
        self.curve.as_ref().map(|(t, _)| t)
    }

    /// Rank position of a saved vertex, in curve mode.
    pub fn rank(&self, index: u32) -> Option<f64> {
        self.curve.as_ref().map(|(_, ranks)| ranks.get(index))
    }

    /// Target position for one pair of the working set.
    pub fn resolve(&self, record: &VertexRecord, live: &LiveVertex) -> RestoreResult<Point3<f64>> {
        resolve(
            record,
            live,
            &self.config,
            self.rank(record.index),
            self.table(),
        )
    }
}
