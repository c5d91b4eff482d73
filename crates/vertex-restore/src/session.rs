//! The edit session: one saved snapshot and the operations over it.
//!
//! An [`EditSession`] lives as long as the user edits one object. It owns the
//! snapshot, the overlay cache and the overlay visibility flag; everything else
//! is passed in per call. Leaving edit mode or switching the active object
//! clears the snapshot.
//!
//! # Example
//!
//! ```
//! use vertex_restore::{BlendConfiguration, EditSession, Mesh, Vertex};
//!
//! let mut mesh = Mesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0).selected());
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0).selected());
//!
//! let mut session = EditSession::new();
//! session.save(&mesh).unwrap();
//!
//! mesh.vertices[1].position.x = 3.0;
//!
//! let mut config = BlendConfiguration::constant(50);
//! let report = session.restore(&mut mesh, &mut config).unwrap();
//! assert_eq!(report.written, 2);
//! assert_eq!(mesh.vertices[1].position.x, 2.0);
//! ```

use crate::blend::BlendPlan;
use crate::budget::{DEFAULT_RESTORE_BUDGET, Deadline};
use crate::config::{BlendConfiguration, BlendMode};
use crate::error::{RestoreError, RestoreResult};
use crate::mesh::{LiveVertex, MeshAccess};
use crate::overlay::{OverlayFrame, OverlayGeometry, OverlaySettings};
use crate::selection::{SelectionOutcome, SelectionPolicy, apply_to_mesh};
use crate::snapshot::{Snapshot, SnapshotStore, VertexRecord};
use crate::tracing_ext::{OperationTimer, log_progress, log_restore_result, log_restore_timeout};
use nalgebra::Vector3;
use std::time::Duration;
use tracing::{debug, info};

/// Write-pass progress is logged every this many vertices.
const PROGRESS_INTERVAL: usize = 10_000;

/// Result of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    /// Vertices captured.
    pub saved: usize,
    /// Vertex count fingerprint.
    pub total_vertices: usize,
}

/// Result of a completed restore.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreReport {
    pub mode: BlendMode,
    /// Vertices whose position was written.
    pub written: usize,
    /// Hidden vertices sent straight back to their saved position.
    pub hidden_restored: usize,
    /// Largest distance any vertex moved during this restore.
    pub max_displacement: f64,
    pub elapsed: Duration,
}

/// Per-object editing state.
#[derive(Debug, Clone)]
pub struct EditSession {
    store: SnapshotStore,
    overlay: Option<OverlayGeometry>,
    view_active: bool,
    budget: Duration,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    /// Create a session with nothing saved and the default time budget.
    pub fn new() -> Self {
        Self {
            store: SnapshotStore::new(),
            overlay: None,
            view_active: false,
            budget: DEFAULT_RESTORE_BUDGET,
        }
    }

    /// Use a different restore time budget.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn set_budget(&mut self, budget: Duration) {
        self.budget = budget;
    }

    /// Save the mesh's selected vertices, replacing any previous snapshot.
    ///
    /// Fails with [`RestoreError::NoSelection`] and keeps the previous
    /// snapshot when nothing is selected.
    pub fn save<M: MeshAccess + ?Sized>(&mut self, mesh: &M) -> RestoreResult<SaveReport> {
        let _timer = OperationTimer::new("save");
        let snapshot = self.store.save_from(mesh)?;
        let report = SaveReport {
            saved: snapshot.len(),
            total_vertices: snapshot.total_vertex_count(),
        };
        self.overlay = Some(OverlayGeometry::from_snapshot(snapshot, &mesh.edges()));
        info!(
            target: "vertex_restore::session",
            saved = report.saved,
            total_vertices = report.total_vertices,
            "Vertices saved"
        );
        Ok(report)
    }

    /// Whether a snapshot exists.
    pub fn is_saved(&self) -> bool {
        self.store.is_saved()
    }

    /// Number of saved vertices, zero when nothing is saved.
    pub fn saved_count(&self) -> usize {
        self.store.get().map_or(0, Snapshot::len)
    }

    /// Whether restore and select can run against a mesh of this size.
    pub fn is_valid(&self, live_vertex_count: usize) -> bool {
        self.store.is_valid(live_vertex_count)
    }

    /// The current snapshot, valid or not.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.store.get()
    }

    /// Blend saved vertices back toward their saved positions.
    ///
    /// Nothing is written when the configuration is invalid, nothing is saved,
    /// or the vertex count changed since saving. If the time budget runs out
    /// partway, vertices already written keep their new position, `config` is
    /// reset to constant rate 0 and [`RestoreError::TimeoutBudgetExceeded`] is
    /// returned.
    pub fn restore<M: MeshAccess + ?Sized>(
        &self,
        mesh: &mut M,
        config: &mut BlendConfiguration,
    ) -> RestoreResult<RestoreReport> {
        let deadline = Deadline::after(self.budget);
        config.validate()?;

        let vertex_count = mesh.vertex_count();
        let snapshot = self.store.require_valid(vertex_count)?;
        let _timer = OperationTimer::with_context("restore", snapshot.len(), vertex_count);

        // Read every live vertex before writing any.
        let working = snapshot
            .records()
            .iter()
            .map(|record| {
                mesh.vertex(record.index)
                    .map(|live| (*record, live))
                    .ok_or_else(|| RestoreError::vertex_out_of_range(record.index, vertex_count))
            })
            .collect::<RestoreResult<Vec<(VertexRecord, LiveVertex)>>>()?;

        let plan = BlendPlan::build(config, &working)?;

        let total = working.len();
        let mut report = RestoreReport {
            mode: config.mode,
            written: 0,
            hidden_restored: 0,
            max_displacement: 0.0,
            elapsed: Duration::ZERO,
        };

        for (record, live) in &working {
            let target = plan.resolve(record, live)?;
            mesh.set_position(record.index, target)?;

            report.written += 1;
            if live.hidden && !config.change_hidden_vertices {
                report.hidden_restored += 1;
            }
            report.max_displacement = report
                .max_displacement
                .max(nalgebra::distance(&live.position, &target));

            if let Err(err) = deadline.check(report.written, total) {
                config.reset_to_safe_default();
                log_restore_timeout(report.written, total, deadline.elapsed().as_millis());
                return Err(err);
            }
            if report.written % PROGRESS_INTERVAL == 0 {
                log_progress("restore", report.written, total);
            }
        }

        report.elapsed = deadline.elapsed();
        log_restore_result(&report);
        Ok(report)
    }

    /// Re-apply the saved selection to the mesh under `policy`.
    pub fn select_saved<M: MeshAccess + ?Sized>(
        &self,
        mesh: &mut M,
        policy: SelectionPolicy,
    ) -> RestoreResult<SelectionOutcome> {
        let snapshot = self.store.require_valid(mesh.vertex_count())?;
        let indices: Vec<u32> = snapshot.indices().collect();
        apply_to_mesh(mesh, &indices, policy)
    }

    /// Forget the snapshot and its overlay. Idempotent.
    pub fn reset(&mut self) {
        self.store.reset();
        self.overlay = None;
    }

    /// The user switched to a different object.
    pub fn on_active_object_changed(&mut self) {
        if self.is_saved() {
            debug!(target: "vertex_restore::session", "Active object changed");
        }
        self.reset();
    }

    /// The user left edit mode.
    pub fn on_edit_mode_exit(&mut self) {
        if self.is_saved() {
            debug!(target: "vertex_restore::session", "Left edit mode");
        }
        self.reset();
    }

    pub fn is_view_active(&self) -> bool {
        self.view_active
    }

    pub fn set_view_active(&mut self, active: bool) {
        self.view_active = active;
    }

    /// Flip overlay visibility and return the new state.
    pub fn toggle_view(&mut self) -> bool {
        self.view_active = !self.view_active;
        self.view_active
    }

    /// Cached overlay geometry, if something is saved.
    pub fn overlay(&self) -> Option<&OverlayGeometry> {
        self.overlay.as_ref()
    }

    /// Geometry for one redraw, or `None` when the view is off or nothing is saved.
    pub fn overlay_frame(
        &self,
        settings: &OverlaySettings,
        view_z: &Vector3<f64>,
    ) -> Option<OverlayFrame> {
        if !self.view_active {
            return None;
        }
        self.overlay.as_ref().map(|o| o.frame(settings, view_z))
    }
}
