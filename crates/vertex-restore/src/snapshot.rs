//! Saved vertex records and the vertex-count fingerprint.
//!
//! A [`Snapshot`] freezes position, normal and index of every selected vertex
//! together with the total vertex count of the mesh at save time. The count is
//! a structural fingerprint: once the live mesh has a different number of
//! vertices, indices can no longer be trusted and restore/select must refuse to
//! run.
//!
//! # Example
//!
//! ```
//! use vertex_restore::{Mesh, SnapshotStore, Vertex};
//!
//! let mut mesh = Mesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0).selected());
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//!
//! let mut store = SnapshotStore::new();
//! let snapshot = store.save_from(&mesh).unwrap();
//! assert_eq!(snapshot.len(), 1);
//! assert!(store.is_valid(2));
//! assert!(!store.is_valid(3));
//! ```

use crate::error::{RestoreError, RestoreResult};
use crate::mesh::{LiveVertex, MeshAccess};
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;
use tracing::debug;

/// One saved vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexRecord {
    pub saved_position: Point3<f64>,
    pub saved_normal: Vector3<f64>,
    /// Host vertex index, the identity used to find the live counterpart.
    pub index: u32,
}

impl From<&LiveVertex> for VertexRecord {
    fn from(v: &LiveVertex) -> Self {
        Self {
            saved_position: v.position,
            saved_normal: v.normal,
            index: v.index,
        }
    }
}

/// An immutable set of saved vertices plus the mesh's vertex count at save time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Vec<VertexRecord>,
    by_index: HashMap<u32, usize>,
    total_vertex_count: usize,
}

impl Snapshot {
    /// Build a snapshot from records.
    ///
    /// Fails with [`RestoreError::NoSelection`] when `records` is empty.
    /// Repeated indices keep their first record.
    pub fn new(
        records: impl IntoIterator<Item = VertexRecord>,
        total_vertex_count: usize,
    ) -> RestoreResult<Self> {
        let mut unique = Vec::new();
        let mut by_index = HashMap::new();
        for record in records {
            if by_index.contains_key(&record.index) {
                continue;
            }
            by_index.insert(record.index, unique.len());
            unique.push(record);
        }

        if unique.is_empty() {
            return Err(RestoreError::NoSelection);
        }

        Ok(Self {
            records: unique,
            by_index,
            total_vertex_count,
        })
    }

    /// Build a snapshot from the selected vertices of a mesh.
    pub fn from_selection(
        selected: &[LiveVertex],
        total_vertex_count: usize,
    ) -> RestoreResult<Self> {
        Self::new(selected.iter().map(VertexRecord::from), total_vertex_count)
    }

    /// Capture every selected vertex of `mesh`.
    pub fn capture<M: MeshAccess + ?Sized>(mesh: &M) -> RestoreResult<Self> {
        Self::from_selection(&mesh.selected_vertices(), mesh.vertex_count())
    }

    /// Saved records in capture order.
    pub fn records(&self) -> &[VertexRecord] {
        &self.records
    }

    /// Look up the record saved for a host vertex index.
    pub fn record(&self, index: u32) -> Option<&VertexRecord> {
        self.by_index.get(&index).map(|&i| &self.records[i])
    }

    /// Whether a host vertex index was saved.
    pub fn contains(&self, index: u32) -> bool {
        self.by_index.contains_key(&index)
    }

    /// Saved indices in capture order.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.records.iter().map(|r| r.index)
    }

    /// Number of saved vertices.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; an empty selection cannot be saved.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Vertex count of the whole mesh when the snapshot was taken.
    pub fn total_vertex_count(&self) -> usize {
        self.total_vertex_count
    }

    /// Whether a mesh with `live_vertex_count` vertices still matches the fingerprint.
    pub fn matches(&self, live_vertex_count: usize) -> bool {
        self.total_vertex_count == live_vertex_count
    }

    /// Error with [`RestoreError::StructuralMismatch`] when the fingerprint differs.
    pub fn check_structure(&self, live_vertex_count: usize) -> RestoreResult<()> {
        if self.matches(live_vertex_count) {
            Ok(())
        } else {
            Err(RestoreError::structural_mismatch(
                self.total_vertex_count,
                live_vertex_count,
            ))
        }
    }
}

/// Holds at most one snapshot for an edit session.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    current: Option<Snapshot>,
}

impl SnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the given selected vertices, replacing any previous snapshot.
    ///
    /// The new snapshot is fully built before it replaces the old one, so a
    /// failed save leaves the previous snapshot untouched.
    pub fn save(
        &mut self,
        selected: &[LiveVertex],
        total_vertex_count: usize,
    ) -> RestoreResult<&Snapshot> {
        let snapshot = Snapshot::from_selection(selected, total_vertex_count)?;
        debug!(
            target: "vertex_restore::session",
            saved = snapshot.len(),
            total_vertices = total_vertex_count,
            "Snapshot saved"
        );
        Ok(self.current.insert(snapshot))
    }

    /// Save every selected vertex of `mesh`.
    pub fn save_from<M: MeshAccess + ?Sized>(&mut self, mesh: &M) -> RestoreResult<&Snapshot> {
        self.save(&mesh.selected_vertices(), mesh.vertex_count())
    }

    /// True iff a snapshot exists and its fingerprint matches.
    pub fn is_valid(&self, live_vertex_count: usize) -> bool {
        self.current
            .as_ref()
            .is_some_and(|s| s.matches(live_vertex_count))
    }

    /// The snapshot if it exists and matches, otherwise the reason it cannot be used.
    pub fn require_valid(&self, live_vertex_count: usize) -> RestoreResult<&Snapshot> {
        let snapshot = self.current.as_ref().ok_or(RestoreError::NoSnapshot)?;
        snapshot.check_structure(live_vertex_count)?;
        Ok(snapshot)
    }

    /// The current snapshot, valid or not.
    pub fn get(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    /// Whether anything is saved.
    pub fn is_saved(&self) -> bool {
        self.current.is_some()
    }

    /// Clear all stored state. Idempotent.
    pub fn reset(&mut self) {
        if self.current.take().is_some() {
            debug!(target: "vertex_restore::session", "Snapshot cleared");
        }
    }
}
