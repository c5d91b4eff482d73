//! Snapshot mesh vertices and blend them back toward where they were.
//!
//! While editing a mesh, the user saves the selected vertices, keeps sculpting
//! or transforming, and later pulls those vertices partway or fully back to
//! their saved positions. The pull can be uniform, or driven by a falloff curve
//! indexed by how far each vertex moved relative to the others.
//!
//! # Features
//!
//! - **Snapshot**: Save selected vertex positions, normals and indices together
//!   with a vertex-count fingerprint that detects topology changes
//! - **Ranking**: Order saved vertices by movement and map them onto `[0, 1]`,
//!   with a roughness tolerance that merges near-equal movements
//! - **Falloff**: Resample curve-widget control points into a dense lookup table
//! - **Blend**: Constant or curve-driven factors, axis locks, full restore,
//!   hidden-vertex protection
//! - **Selection**: Re-select saved vertices as replace, union, subtract or
//!   symmetric difference
//! - **Budget**: Restores give up after a wall-clock budget (3 s by default)
//!   and fall back to a configuration that moves nothing
//!
//! # Blend Factor
//!
//! A factor of `0.0` leaves a vertex where it is now; `1.0` puts it back on its
//! saved position. Constant mode uses `constant_rate / 100`; curve mode reads
//! the falloff table at the vertex's movement rank.
//!
//! # Host Integration
//!
//! The engine never owns mesh data. Hosts implement [`MeshAccess`] over their
//! own mesh and keep one [`EditSession`] per edited object. [`Mesh`] is a
//! small in-memory implementation used by the command-line tool and tests.
//!
//! # Quick Start
//!
//! ```
//! use vertex_restore::{BlendConfiguration, EditSession, Mesh, SelectionPolicy, Vertex};
//!
//! let mut mesh = Mesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0).selected());
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0).selected());
//! mesh.vertices.push(Vertex::from_coords(2.0, 0.0, 0.0));
//!
//! let mut session = EditSession::new();
//! session.save(&mesh).unwrap();
//!
//! // Edit the mesh...
//! mesh.vertices[0].position.z = 5.0;
//! mesh.select_only(&[2]);
//!
//! // ...then pull everything saved fully back.
//! let mut config = BlendConfiguration::constant(100);
//! session.restore(&mut mesh, &mut config).unwrap();
//! assert_eq!(mesh.vertices[0].position.z, 0.0);
//!
//! // And bring the saved selection back.
//! session.select_saved(&mut mesh, SelectionPolicy::Replace).unwrap();
//! assert_eq!(mesh.selected_indices(), vec![0, 1]);
//! ```
//!
//! # Curve Mode
//!
//! ```
//! use vertex_restore::{BlendConfiguration, CurvePoint, EditSession, Mesh, Vertex};
//!
//! let mut mesh = Mesh::new();
//! for i in 0..3 {
//!     mesh.vertices.push(Vertex::from_coords(i as f64, 0.0, 0.0).selected());
//! }
//! let mut session = EditSession::new();
//! session.save(&mesh).unwrap();
//!
//! mesh.vertices[1].position.y = 1.0;
//! mesh.vertices[2].position.y = 2.0;
//!
//! // Linear ramp: the vertex that moved most is fully restored.
//! let mut config = BlendConfiguration::curve(1.0, CurvePoint::linear());
//! session.restore(&mut mesh, &mut config).unwrap();
//! assert_eq!(mesh.vertices[2].position.y, 0.0);
//! assert!(mesh.vertices[1].position.y > 0.0);
//! ```

mod error;
pub mod tracing_ext;
mod types;

#[cfg(test)]
mod edge_cases;

pub mod blend;
pub mod budget;
pub mod config;
pub mod falloff;
pub mod mesh;
pub mod overlay;
pub mod rank;
pub mod selection;
pub mod session;
pub mod snapshot;

// Re-export core types at crate root
pub use error::{ErrorCode, RecoverySuggestion, RestoreError, RestoreResult, VertexLocation};
pub use types::{Mesh, Vertex};

pub use blend::{BlendPlan, resolve};
pub use budget::{DEFAULT_RESTORE_BUDGET, Deadline};
pub use config::{Axis, AxisLocks, BlendConfiguration, BlendMode, ConfigError, EvalReference};
pub use falloff::{CurvePoint, FalloffTable};
pub use mesh::{LiveVertex, MeshAccess};
pub use overlay::{OverlayFrame, OverlayGeometry, OverlaySettings};
pub use rank::{RankMap, RankedVertex, movement_magnitude, rank_movement};
pub use selection::{SelectionOutcome, SelectionPolicy, reconcile};
pub use session::{EditSession, RestoreReport, SaveReport};
pub use snapshot::{Snapshot, SnapshotStore, VertexRecord};

pub use tracing_ext::{OperationTimer, log_progress, log_restore_result, log_restore_timeout};
