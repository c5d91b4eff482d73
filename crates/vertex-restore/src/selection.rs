//! Re-applying a saved selection to the live mesh.
//!
//! The saved indices act as a second selection set combined with the live one
//! under a [`SelectionPolicy`]. Only `Replace` touches vertices outside the
//! saved set.
//!
//! # Example
//!
//! ```
//! use vertex_restore::selection::{SelectionPolicy, reconcile};
//!
//! let live = [true, false, true, false];
//! assert_eq!(
//!     reconcile(&live, [1, 2], SelectionPolicy::SymmetricDifference),
//!     vec![true, true, false, false]
//! );
//! ```

use crate::error::RestoreResult;
use crate::mesh::MeshAccess;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, warn};

/// How saved indices combine with the live selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Select exactly the saved vertices.
    #[default]
    Replace,
    /// Add the saved vertices to the selection.
    Union,
    /// Remove the saved vertices from the selection.
    Subtract,
    /// Flip the selection of every saved vertex.
    SymmetricDifference,
}

impl SelectionPolicy {
    pub const ALL: [SelectionPolicy; 4] = [
        SelectionPolicy::Replace,
        SelectionPolicy::Union,
        SelectionPolicy::Subtract,
        SelectionPolicy::SymmetricDifference,
    ];

    /// Name used by the editor's selection-mode enum.
    pub fn editor_name(&self) -> &'static str {
        match self {
            SelectionPolicy::Replace => "SELECT_SET",
            SelectionPolicy::Union => "SELECT_EXTEND",
            SelectionPolicy::Subtract => "SELECT_SUBTRACT",
            SelectionPolicy::SymmetricDifference => "SELECT_DIFFERENCE",
        }
    }

    /// New flag for a saved vertex whose current flag is `current`.
    #[inline]
    fn apply(self, current: bool) -> bool {
        match self {
            SelectionPolicy::Replace | SelectionPolicy::Union => true,
            SelectionPolicy::Subtract => false,
            SelectionPolicy::SymmetricDifference => !current,
        }
    }
}

impl std::fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SelectionPolicy::Replace => "replace",
            SelectionPolicy::Union => "union",
            SelectionPolicy::Subtract => "subtract",
            SelectionPolicy::SymmetricDifference => "symmetric_difference",
        };
        write!(f, "{}", name)
    }
}

/// Error for an unrecognized policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown selection policy '{0}'")]
pub struct ParsePolicyError(pub String);

impl FromStr for SelectionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "replace" | "set" | "select_set" => Ok(SelectionPolicy::Replace),
            "union" | "extend" | "select_extend" => Ok(SelectionPolicy::Union),
            "subtract" | "select_subtract" => Ok(SelectionPolicy::Subtract),
            "symmetric_difference" | "difference" | "select_difference" => {
                Ok(SelectionPolicy::SymmetricDifference)
            }
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Combine live selection flags with saved indices.
///
/// Saved indices past the end of `live_flags` are ignored. Repeated indices
/// count once.
pub fn reconcile(
    live_flags: &[bool],
    saved_indices: impl IntoIterator<Item = u32>,
    policy: SelectionPolicy,
) -> Vec<bool> {
    let mut flags = match policy {
        SelectionPolicy::Replace => vec![false; live_flags.len()],
        _ => live_flags.to_vec(),
    };

    let mut seen = HashSet::new();
    for index in saved_indices {
        if !seen.insert(index) {
            continue;
        }
        let i = index as usize;
        if let Some(&current) = live_flags.get(i) {
            flags[i] = policy.apply(current);
        }
    }
    flags
}

/// What [`apply_to_mesh`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionOutcome {
    pub policy: SelectionPolicy,
    /// Vertices whose flag was written.
    pub changed: usize,
    /// Selected vertices after the call.
    pub selected: usize,
}

/// Reconcile the live mesh's selection with saved indices, writing only flags
/// that change.
///
/// Flags are keyed by each live vertex's own index. Indices the mesh does not
/// resolve are never written. The caller checks the snapshot still matches
/// the mesh first.
pub fn apply_to_mesh<M: MeshAccess + ?Sized>(
    mesh: &mut M,
    saved_indices: &[u32],
    policy: SelectionPolicy,
) -> RestoreResult<SelectionOutcome> {
    let vertex_count = mesh.vertex_count();
    let mut live = vec![false; vertex_count];
    let mut present = vec![false; vertex_count];
    for vertex in mesh.vertices() {
        let i = vertex.index as usize;
        if i < vertex_count {
            live[i] = vertex.selected;
            present[i] = true;
        }
    }

    let out_of_range = saved_indices
        .iter()
        .filter(|&&i| !present.get(i as usize).copied().unwrap_or(false))
        .count();
    if out_of_range > 0 {
        warn!(
            target: "vertex_restore::selection",
            out_of_range,
            vertex_count,
            "Skipping saved indices the mesh does not resolve"
        );
    }

    let next = reconcile(&live, saved_indices.iter().copied(), policy);

    let mut changed = 0;
    let mut selected = 0;
    for (i, ((&before, &after), &exists)) in live.iter().zip(&next).zip(&present).enumerate() {
        if !exists {
            continue;
        }
        if before != after {
            mesh.set_selected(i as u32, after)?;
            changed += 1;
        }
        if after {
            selected += 1;
        }
    }

    let outcome = SelectionOutcome {
        policy,
        changed,
        selected,
    };
    debug!(
        target: "vertex_restore::selection",
        policy = %policy,
        saved = saved_indices.len(),
        changed = outcome.changed,
        selected = outcome.selected,
        "Selection reconciled"
    );
    Ok(outcome)
}
