// Allow unused_assignments lint for error struct fields that are used in thiserror Display macros
// but appear as "never read" to the compiler.
#![allow(unused_assignments)]

//! Error types for save, restore and select operations with rich diagnostics.
//!
//! Every error carries:
//! - A machine-readable error code
//! - A recovery suggestion the editor can show next to the message
//! - Location information when a specific vertex is involved
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `VREST-XXXX`:
//! - `VREST-1xxx`: Session state errors (nothing saved, empty selection)
//! - `VREST-2xxx`: Structural errors (topology changed since save)
//! - `VREST-3xxx`: Budget errors (restore took too long)
//! - `VREST-4xxx`: Input errors (curve or configuration out of range)
//!
//! # Example
//!
//! ```
//! use vertex_restore::{ErrorCode, RestoreError};
//!
//! let err = RestoreError::structural_mismatch(10, 9);
//! assert_eq!(err.code(), ErrorCode::StructuralMismatch);
//! assert_eq!(err.code().as_str(), "VREST-2001");
//! ```

use miette::Diagnostic;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for restore operations.
pub type RestoreResult<T> = Result<T, RestoreError>;

/// Machine-readable error codes.
///
/// Codes follow the pattern `VREST-XXXX` where:
/// - 1xxx = Session state errors
/// - 2xxx = Structural errors
/// - 3xxx = Budget errors
/// - 4xxx = Input errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Session state errors (1xxx)
    /// VREST-1001: Save attempted with no selected vertices
    NoSelection = 1001,
    /// VREST-1002: Restore or select attempted before anything was saved
    NoSnapshot = 1002,

    // Structural errors (2xxx)
    /// VREST-2001: Live vertex count differs from the saved fingerprint
    StructuralMismatch = 2001,
    /// VREST-2002: A saved vertex index no longer resolves
    VertexOutOfRange = 2002,

    // Budget errors (3xxx)
    /// VREST-3001: Restore exceeded its wall-clock budget
    TimeoutBudgetExceeded = 3001,

    // Input errors (4xxx)
    /// VREST-4001: Falloff curve control points are unusable
    InvalidCurve = 4001,
    /// VREST-4002: Blend configuration value out of range
    InvalidConfig = 4002,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `VREST-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoSelection => "VREST-1001",
            ErrorCode::NoSnapshot => "VREST-1002",
            ErrorCode::StructuralMismatch => "VREST-2001",
            ErrorCode::VertexOutOfRange => "VREST-2002",
            ErrorCode::TimeoutBudgetExceeded => "VREST-3001",
            ErrorCode::InvalidCurve => "VREST-4001",
            ErrorCode::InvalidConfig => "VREST-4002",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions shown alongside an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Select some vertices and try again.
    SelectVertices,
    /// Save a snapshot first.
    SaveFirst,
    /// Topology changed; the snapshot can only be viewed or reset.
    ResetSnapshot,
    /// Save fewer vertices so the restore fits in its budget.
    ReduceSelection { saved: usize },
    /// Adjust the named parameters.
    AdjustParameters { parameters: Vec<(String, String)> },
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::SelectVertices => {
                write!(f, "Select at least one vertex before saving")
            }
            RecoverySuggestion::SaveFirst => write!(f, "Save the selected vertices first"),
            RecoverySuggestion::ResetSnapshot => write!(
                f,
                "Vertices were added or removed since saving; reset the saved vertices and save again"
            ),
            RecoverySuggestion::ReduceSelection { saved } => write!(
                f,
                "Try saving fewer vertices (currently {} saved)",
                saved
            ),
            RecoverySuggestion::AdjustParameters { parameters } => {
                let params: Vec<String> = parameters
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                write!(f, "Try adjusting: {}", params.join(", "))
            }
        }
    }
}

/// Location information for errors tied to one vertex.
#[derive(Debug, Clone)]
pub struct VertexLocation {
    pub index: u32,
    pub vertex_count: usize,
}

impl std::fmt::Display for VertexLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vertex {} of {}", self.index, self.vertex_count)
    }
}

/// Errors that can occur while saving, restoring or selecting vertices.
///
/// None of these are fatal to an edit session; the user re-triggers the
/// operation after adjusting inputs.
#[derive(Debug, Error, Diagnostic)]
pub enum RestoreError {
    /// Save attempted with zero selected vertices.
    #[error("no vertices are selected")]
    #[diagnostic(
        code(vertex_restore::session::no_selection),
        help("Select the vertices to remember, then save.")
    )]
    NoSelection,

    /// Restore or select attempted with no saved snapshot.
    #[error("no vertices have been saved")]
    #[diagnostic(
        code(vertex_restore::session::no_snapshot),
        help("Save a selection before restoring or re-selecting it.")
    )]
    NoSnapshot,

    /// The live mesh no longer has the vertex count recorded at save time.
    #[error(
        "vertex count changed since save: saved with {expected} vertices, mesh now has {actual}"
    )]
    #[diagnostic(
        code(vertex_restore::structure::mismatch),
        help(
            "Vertices cannot be restored or re-selected after vertices are added or removed. Reset the saved vertices."
        )
    )]
    StructuralMismatch { expected: usize, actual: usize },

    /// A saved index did not resolve to a live vertex.
    #[error("saved vertex {index} does not exist in a mesh of {vertex_count} vertices")]
    #[diagnostic(code(vertex_restore::structure::vertex_index))]
    VertexOutOfRange { index: u32, vertex_count: usize },

    /// Restore ran past its wall-clock budget.
    #[error(
        "restore cancelled after {elapsed_ms} ms (budget {budget_ms} ms); {processed} of {total} vertices were written"
    )]
    #[diagnostic(
        code(vertex_restore::budget::timeout),
        help("Processing took too long. Try saving fewer vertices.")
    )]
    TimeoutBudgetExceeded {
        budget_ms: u128,
        elapsed_ms: u128,
        processed: usize,
        total: usize,
    },

    /// Falloff curve control points cannot be sampled.
    #[error("invalid falloff curve: {details}")]
    #[diagnostic(
        code(vertex_restore::input::curve),
        help("The curve needs at least two points with x ascending inside [0, 1].")
    )]
    InvalidCurve { details: String },

    /// Blend configuration value out of range.
    #[error("invalid blend configuration: {field} {details}")]
    #[diagnostic(code(vertex_restore::input::config))]
    InvalidConfig { field: &'static str, details: String },
}

impl RestoreError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RestoreError::NoSelection => ErrorCode::NoSelection,
            RestoreError::NoSnapshot => ErrorCode::NoSnapshot,
            RestoreError::StructuralMismatch { .. } => ErrorCode::StructuralMismatch,
            RestoreError::VertexOutOfRange { .. } => ErrorCode::VertexOutOfRange,
            RestoreError::TimeoutBudgetExceeded { .. } => ErrorCode::TimeoutBudgetExceeded,
            RestoreError::InvalidCurve { .. } => ErrorCode::InvalidCurve,
            RestoreError::InvalidConfig { .. } => ErrorCode::InvalidConfig,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            RestoreError::NoSelection => RecoverySuggestion::SelectVertices,
            RestoreError::NoSnapshot => RecoverySuggestion::SaveFirst,
            RestoreError::StructuralMismatch { .. } | RestoreError::VertexOutOfRange { .. } => {
                RecoverySuggestion::ResetSnapshot
            }
            RestoreError::TimeoutBudgetExceeded { total, .. } => {
                RecoverySuggestion::ReduceSelection { saved: *total }
            }
            RestoreError::InvalidCurve { .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![(
                    "control_points".into(),
                    "at least two points, x ascending in [0, 1]".into(),
                )],
            },
            RestoreError::InvalidConfig { field, details } => {
                RecoverySuggestion::AdjustParameters {
                    parameters: vec![((*field).into(), details.clone())],
                }
            }
        }
    }

    /// Returns location information if available.
    pub fn location(&self) -> Option<VertexLocation> {
        match self {
            RestoreError::VertexOutOfRange {
                index,
                vertex_count,
            } => Some(VertexLocation {
                index: *index,
                vertex_count: *vertex_count,
            }),
            _ => None,
        }
    }

    /// Whether the session's blend configuration should be reset after this error.
    pub fn resets_configuration(&self) -> bool {
        matches!(self, RestoreError::TimeoutBudgetExceeded { .. })
    }

    // Constructor helpers for common error patterns

    /// Create a StructuralMismatch error.
    pub fn structural_mismatch(expected: usize, actual: usize) -> Self {
        RestoreError::StructuralMismatch { expected, actual }
    }

    /// Create a VertexOutOfRange error.
    pub fn vertex_out_of_range(index: u32, vertex_count: usize) -> Self {
        RestoreError::VertexOutOfRange {
            index,
            vertex_count,
        }
    }

    /// Create a TimeoutBudgetExceeded error.
    pub fn timeout(budget: Duration, elapsed: Duration, processed: usize, total: usize) -> Self {
        RestoreError::TimeoutBudgetExceeded {
            budget_ms: budget.as_millis(),
            elapsed_ms: elapsed.as_millis(),
            processed,
            total,
        }
    }

    /// Create an InvalidCurve error.
    pub fn invalid_curve(details: impl Into<String>) -> Self {
        RestoreError::InvalidCurve {
            details: details.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(field: &'static str, details: impl Into<String>) -> Self {
        RestoreError::InvalidConfig {
            field,
            details: details.into(),
        }
    }
}
