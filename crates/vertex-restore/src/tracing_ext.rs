//! Tracing extensions for save, restore and select.
//!
//! Enable output by installing a subscriber in the host application:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // RUST_LOG=vertex_restore=debug for per-operation detail
//! ```
//!
//! # Targets
//!
//! - `vertex_restore::timing`: operation start and elapsed time
//! - `vertex_restore::session`: snapshot lifecycle, restore results
//! - `vertex_restore::selection`: selection reconciliation
//! - `vertex_restore::progress`: write-pass progress

use std::time::Instant;
use tracing::span::EnteredSpan;
use tracing::{Span, debug, info, warn};

/// A performance timer that logs duration on drop.
///
/// ```rust,ignore
/// use vertex_restore::tracing_ext::OperationTimer;
///
/// fn restore() {
///     let _timer = OperationTimer::new("restore");
///     // ... do work ...
/// } // Timer logs duration when dropped
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: EnteredSpan,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("vertex_operation", operation = name);
        debug!(target: "vertex_restore::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span: span.entered(),
        }
    }

    /// Create a timer recording how many vertices are saved and in the mesh.
    pub fn with_context(name: &'static str, saved_count: usize, vertex_count: usize) -> Self {
        let span = tracing::info_span!(
            "vertex_operation",
            operation = name,
            saved = saved_count,
            vertices = vertex_count
        );
        debug!(
            target: "vertex_restore::timing",
            operation = name,
            saved = saved_count,
            vertices = vertex_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span: span.entered(),
        }
    }

    /// Get the elapsed time.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Get the span for this timer. It stays entered until the timer drops.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "vertex_restore::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log a finished restore.
pub fn log_restore_result(report: &crate::RestoreReport) {
    info!(
        target: "vertex_restore::session",
        mode = %report.mode,
        written = report.written,
        hidden_restored = report.hidden_restored,
        max_displacement = format!("{:.6}", report.max_displacement),
        "Restore completed"
    );
}

/// Log a restore that ran out of time.
pub fn log_restore_timeout(processed: usize, total: usize, elapsed_ms: u128) {
    warn!(
        target: "vertex_restore::session",
        processed,
        total,
        elapsed_ms,
        "Restore cancelled by time budget; configuration reset to constant rate 0"
    );
}

/// Log progress for the write pass.
pub fn log_progress(operation: &str, current: usize, total: usize) {
    let percent = if total > 0 {
        (current as f64 / total as f64 * 100.0) as u32
    } else {
        0
    };

    debug!(
        target: "vertex_restore::progress",
        operation = operation,
        current = current,
        total = total,
        percent = percent,
        "Progress update"
    );
}
