//! Cached geometry for drawing the saved vertices over the viewport.
//!
//! Built once when a selection is saved: the saved points plus every edge
//! whose two endpoints were both saved. A redraw callback reads it every frame
//! and never mutates it. Edges whose summed endpoint normals point away from
//! the viewer are culled so back-facing wireframe does not clutter the view.

use crate::snapshot::Snapshot;
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

/// What the overlay draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlaySettings {
    pub show_points: bool,
    pub show_lines: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            show_points: true,
            show_lines: true,
        }
    }
}

/// Saved points and the edges between them, in saved-record order.
#[derive(Debug, Clone, Default)]
pub struct OverlayGeometry {
    points: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
    /// Indices into `points`.
    lines: Vec<[usize; 2]>,
}

impl OverlayGeometry {
    /// Cache a snapshot's points and the mesh edges among them.
    pub fn from_snapshot(snapshot: &Snapshot, edges: &[[u32; 2]]) -> Self {
        let local: HashMap<u32, usize> = snapshot
            .indices()
            .enumerate()
            .map(|(i, index)| (index, i))
            .collect();

        let lines = edges
            .iter()
            .filter_map(|[a, b]| Some([*local.get(a)?, *local.get(b)?]))
            .filter(|[a, b]| a != b)
            .collect();

        Self {
            points: snapshot.records().iter().map(|r| r.saved_position).collect(),
            normals: snapshot.records().iter().map(|r| r.saved_normal).collect(),
            lines,
        }
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// All cached edges, facing or not.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Edge segments facing a viewer looking along `view_z`.
    ///
    /// `view_z` is the view rotation's z column. An edge is dropped when the
    /// sum of its endpoint normals has a negative dot product with it.
    pub fn visible_lines(&self, view_z: &Vector3<f64>) -> Vec<[Point3<f64>; 2]> {
        self.lines
            .iter()
            .filter(|[a, b]| (self.normals[*a] + self.normals[*b]).dot(view_z) >= 0.0)
            .map(|[a, b]| [self.points[*a], self.points[*b]])
            .collect()
    }

    /// Everything to draw this frame.
    pub fn frame(&self, settings: &OverlaySettings, view_z: &Vector3<f64>) -> OverlayFrame {
        OverlayFrame {
            points: if settings.show_points {
                self.points.clone()
            } else {
                Vec::new()
            },
            lines: if settings.show_lines {
                self.visible_lines(view_z)
            } else {
                Vec::new()
            },
        }
    }
}

/// Geometry for one redraw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayFrame {
    pub points: Vec<Point3<f64>>,
    pub lines: Vec<[Point3<f64>; 2]>,
}

impl OverlayFrame {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty()
    }
}
