//! Core mesh data types.
//!
//! [`Mesh`] is a minimal in-memory mesh that implements [`MeshAccess`]. Hosts
//! with their own mesh representation implement the trait directly instead.

use crate::error::{RestoreError, RestoreResult};
use crate::mesh::{LiveVertex, MeshAccess};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

fn default_normal() -> Vector3<f64> {
    Vector3::z()
}

/// A vertex with the per-vertex state an editor tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Unit normal vector.
    #[serde(default = "default_normal")]
    pub normal: Vector3<f64>,

    /// Hidden in the editor.
    #[serde(default)]
    pub hidden: bool,

    /// Selected in the editor.
    #[serde(default)]
    pub selected: bool,
}

impl Vertex {
    /// Create a new vertex with only position set.
    #[inline]
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: default_normal(),
            hidden: false,
            selected: false,
        }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Mark the vertex as selected.
    #[inline]
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Mark the vertex as hidden.
    #[inline]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set the vertex normal.
    #[inline]
    pub fn with_normal(mut self, normal: Vector3<f64>) -> Self {
        self.normal = normal;
        self
    }
}

/// An editable mesh: vertices plus the edges between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex data, indexed by position in this vector.
    pub vertices: Vec<Vertex>,

    /// Edges as pairs of vertex indices.
    #[serde(default)]
    pub edges: Vec<[u32; 2]>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, edge_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            edges: Vec::with_capacity(edge_count),
        }
    }

    /// Create a mesh from raw positions with no edges.
    pub fn from_positions(positions: impl IntoIterator<Item = [f64; 3]>) -> Self {
        Self {
            vertices: positions
                .into_iter()
                .map(|[x, y, z]| Vertex::from_coords(x, y, z))
                .collect(),
            edges: Vec::new(),
        }
    }

    /// Number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Indices of selected vertices, ascending.
    pub fn selected_indices(&self) -> Vec<u32> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.selected)
            .map(|(i, _)| i as u32)
            .collect()
    }

    /// Select exactly the given vertices.
    pub fn select_only(&mut self, indices: &[u32]) {
        for v in &mut self.vertices {
            v.selected = false;
        }
        for &i in indices {
            if let Some(v) = self.vertices.get_mut(i as usize) {
                v.selected = true;
            }
        }
    }

    /// Per-vertex selection flags.
    pub fn selection_flags(&self) -> Vec<bool> {
        self.vertices.iter().map(|v| v.selected).collect()
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;
        let mut min = first.position;
        let mut max = first.position;

        for vertex in &self.vertices[1..] {
            let p = &vertex.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    fn vertex_mut(&mut self, index: u32) -> RestoreResult<&mut Vertex> {
        let vertex_count = self.vertices.len();
        self.vertices
            .get_mut(index as usize)
            .ok_or_else(|| RestoreError::vertex_out_of_range(index, vertex_count))
    }
}

impl MeshAccess for Mesh {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex(&self, index: u32) -> Option<LiveVertex> {
        self.vertices.get(index as usize).map(|v| LiveVertex {
            index,
            position: v.position,
            normal: v.normal,
            hidden: v.hidden,
            selected: v.selected,
        })
    }

    fn set_position(&mut self, index: u32, position: Point3<f64>) -> RestoreResult<()> {
        self.vertex_mut(index)?.position = position;
        Ok(())
    }

    fn set_selected(&mut self, index: u32, selected: bool) -> RestoreResult<()> {
        self.vertex_mut(index)?.selected = selected;
        Ok(())
    }

    fn edges(&self) -> Vec<[u32; 2]> {
        self.edges.clone()
    }
}
