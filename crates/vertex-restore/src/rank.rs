//! Movement ranking.
//!
//! Each saved vertex gets a movement magnitude: how far its live position is
//! from the saved one, or from a fixed reference point when one is given. The
//! non-zero magnitudes are ordered ascending and mapped to an ordinal position
//! in `(0, 1]`, so the vertex that moved the most sits at `1.0` regardless of
//! how far it actually moved. Vertices that did not move stay at `0.0`.
//!
//! Neighbouring magnitudes within `roughness` of each other share a rank,
//! which keeps floating-point noise from splitting one plateau into many.
//!
//! # Example
//!
//! ```
//! use nalgebra::{Point3, Vector3};
//! use vertex_restore::rank::{RankMap, rank_movement};
//! use vertex_restore::VertexRecord;
//!
//! let records: Vec<VertexRecord> = (0..3)
//!     .map(|i| VertexRecord {
//!         saved_position: Point3::new(i as f64, 0.0, 0.0),
//!         saved_normal: Vector3::z(),
//!         index: i,
//!     })
//!     .collect();
//! let live = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 1.0),
//!     Point3::new(4.0, 0.0, 0.0),
//! ];
//!
//! let ranks = RankMap::from(rank_movement(&records, |r| live[r.index as usize], 0.0, None));
//! assert_eq!(ranks.get(0), 0.0);
//! assert_eq!(ranks.get(1), 0.5);
//! assert_eq!(ranks.get(2), 1.0);
//! ```

use crate::snapshot::VertexRecord;
use nalgebra::Point3;
use std::collections::HashMap;

/// A saved vertex with its movement magnitude and rank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedVertex {
    pub index: u32,
    pub magnitude: f64,
    /// Ordinal position in `[0, 1]`.
    pub rank_position: f64,
}

/// Distance used to rank one vertex.
///
/// Without a reference this is the distance from `saved` to `live`. With a
/// reference it is the distance from the reference to `live`; the saved
/// position plays no part. Exactly coincident points give exactly zero.
pub fn movement_magnitude(
    saved: &Point3<f64>,
    live: &Point3<f64>,
    reference: Option<&Point3<f64>>,
) -> f64 {
    let origin = reference.unwrap_or(saved);
    if origin == live {
        0.0
    } else {
        nalgebra::distance(origin, live)
    }
}

/// Rank saved vertices by how far they moved.
///
/// `live_position` returns the live position for a record; the caller resolves
/// every record before ranking. Output order is unspecified; use [`RankMap`]
/// for lookups.
pub fn rank_movement<F>(
    records: &[VertexRecord],
    mut live_position: F,
    roughness: f64,
    reference: Option<&Point3<f64>>,
) -> Vec<RankedVertex>
where
    F: FnMut(&VertexRecord) -> Point3<f64>,
{
    let mut ranked = Vec::with_capacity(records.len());
    let mut moving: Vec<(f64, u32)> = Vec::with_capacity(records.len());

    for record in records {
        let live = live_position(record);
        let magnitude = movement_magnitude(&record.saved_position, &live, reference);
        if magnitude == 0.0 {
            ranked.push(RankedVertex {
                index: record.index,
                magnitude,
                rank_position: 0.0,
            });
        } else {
            moving.push((magnitude, record.index));
        }
    }

    moving.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let total = moving.len() as f64;
    let mut previous: Option<(f64, f64)> = None;
    for (i, &(magnitude, index)) in moving.iter().enumerate() {
        let rank_position = match previous {
            // Ties collapse onto the preceding rank, producing plateaus.
            Some((prev_magnitude, prev_rank)) if (magnitude - prev_magnitude).abs() <= roughness => {
                prev_rank
            }
            _ => (i + 1) as f64 / total,
        };
        previous = Some((magnitude, rank_position));
        ranked.push(RankedVertex {
            index,
            magnitude,
            rank_position,
        });
    }

    ranked
}

/// Index to rank lookup built from [`rank_movement`] output.
#[derive(Debug, Clone, Default)]
pub struct RankMap {
    positions: HashMap<u32, f64>,
}

impl RankMap {
    /// Rank position for a vertex; unranked vertices sit at `0.0`.
    pub fn get(&self, index: u32) -> f64 {
        self.positions.get(&index).copied().unwrap_or(0.0)
    }

    /// Number of ranked vertices.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if nothing was ranked.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl From<Vec<RankedVertex>> for RankMap {
    fn from(ranked: Vec<RankedVertex>) -> Self {
        Self {
            positions: ranked
                .into_iter()
                .map(|r| (r.index, r.rank_position))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn records_on_x(xs: &[f64]) -> Vec<VertexRecord> {
        xs.iter()
            .enumerate()
            .map(|(i, &x)| VertexRecord {
                saved_position: Point3::new(x, 0.0, 0.0),
                saved_normal: Vector3::z(),
                index: i as u32,
            })
            .collect()
    }

    fn rank_with_offsets(offsets: &[f64], roughness: f64) -> RankMap {
        let records = records_on_x(&vec![0.0; offsets.len()]);
        RankMap::from(rank_movement(
            &records,
            |r| Point3::new(offsets[r.index as usize], 0.0, 0.0),
            roughness,
            None,
        ))
    }

    #[test]
    fn test_three_vertex_scenario() {
        let records = records_on_x(&[0.0, 1.0, 2.0]);
        let live = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(4.0, 0.0, 0.0),
        ];
        let ranked = rank_movement(&records, |r| live[r.index as usize], 0.0, None);
        assert_eq!(ranked.len(), 3);

        let by_index: HashMap<u32, RankedVertex> = ranked.iter().map(|r| (r.index, *r)).collect();
        assert_eq!(by_index[&0].magnitude, 0.0);
        assert_eq!(by_index[&0].rank_position, 0.0);
        assert_relative_eq!(by_index[&1].magnitude, 1.0);
        assert_relative_eq!(by_index[&1].rank_position, 0.5);
        assert_relative_eq!(by_index[&2].magnitude, 2.0);
        assert_eq!(by_index[&2].rank_position, 1.0);
    }

    #[test]
    fn test_roughness_plateau() {
        // Magnitudes 1.0, 1.05, 1.1, 3.0 with roughness 0.06 chain the first three.
        let ranks = rank_with_offsets(&[1.0, 1.05, 1.1, 3.0], 0.06);
        assert_relative_eq!(ranks.get(0), 0.25);
        assert_relative_eq!(ranks.get(1), 0.25);
        assert_relative_eq!(ranks.get(2), 0.25);
        assert_eq!(ranks.get(3), 1.0);
    }

    #[test]
    fn test_ties_collapse_forward() {
        // The tie at the top takes the earlier rank, so nothing reaches 1.0.
        let ranks = rank_with_offsets(&[1.0, 2.0, 2.0], 0.0);
        assert_relative_eq!(ranks.get(0), 1.0 / 3.0);
        assert_relative_eq!(ranks.get(1), 2.0 / 3.0);
        assert_relative_eq!(ranks.get(2), 2.0 / 3.0);
    }

    #[test]
    fn test_reference_uses_live_position() {
        let records = records_on_x(&[10.0, 20.0]);
        let reference = Point3::new(0.0, 0.0, 0.0);
        // Vertex 0 did not move but sits 10 from the reference; vertex 1 sits on it.
        let live = [Point3::new(10.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)];
        let ranked = rank_movement(&records, |r| live[r.index as usize], 0.0, Some(&reference));
        let ranks = RankMap::from(ranked);
        assert_eq!(ranks.get(0), 1.0);
        assert_eq!(ranks.get(1), 0.0);
    }

    #[test]
    fn test_unmoved_vertices_rank_zero() {
        let ranks = rank_with_offsets(&[0.0, 0.0], 0.5);
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks.get(0), 0.0);
        assert_eq!(ranks.get(1), 0.0);
        assert_eq!(ranks.get(99), 0.0);
    }

    #[test]
    fn test_movement_magnitude() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(4.0, 6.0, 3.0);
        assert_relative_eq!(movement_magnitude(&a, &b, None), 5.0);
        assert_eq!(movement_magnitude(&a, &a, None), 0.0);
        assert_relative_eq!(movement_magnitude(&a, &b, Some(&Point3::origin())), 61f64.sqrt());
    }
}
