//! The mesh accessor seam between the engine and the host editor.
//!
//! The engine never owns mesh data. It reads vertex state through
//! [`MeshAccess`] and writes positions and selection flags back through it.
//! The index space is assumed stable for the duration of one call.

use crate::error::RestoreResult;
use nalgebra::{Point3, Vector3};

/// A read-only view of one live vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveVertex {
    /// Host vertex index.
    pub index: u32,
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
    pub hidden: bool,
    pub selected: bool,
}

/// Read/write access to the host's mesh.
///
/// No transactional guarantees are assumed beyond what the host provides.
pub trait MeshAccess {
    /// Number of vertices in the whole mesh, selected or not.
    fn vertex_count(&self) -> usize;

    /// Look up one vertex by index.
    fn vertex(&self, index: u32) -> Option<LiveVertex>;

    /// Move a vertex.
    fn set_position(&mut self, index: u32, position: Point3<f64>) -> RestoreResult<()>;

    /// Change a vertex's selection flag.
    fn set_selected(&mut self, index: u32, selected: bool) -> RestoreResult<()>;

    /// All vertices in index order.
    fn vertices(&self) -> Vec<LiveVertex> {
        (0..self.vertex_count() as u32)
            .filter_map(|i| self.vertex(i))
            .collect()
    }

    /// Currently selected vertices in index order.
    fn selected_vertices(&self) -> Vec<LiveVertex> {
        self.vertices().into_iter().filter(|v| v.selected).collect()
    }

    /// Edges as vertex index pairs. Only used to draw the saved-vertex overlay.
    fn edges(&self) -> Vec<[u32; 2]> {
        Vec::new()
    }
}
