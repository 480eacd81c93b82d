//! Ordered progress reporting.
//!
//! Each generation run owns one [`ProgressSink`].  The sink records every
//! update in emission order into the run's trail and forwards it to at most
//! one registered observer over a tokio channel; with no observer, updates
//! are recorded and otherwise discarded without error.
//!
//! Invariants the sink enforces:
//!
//! - percentages are non-decreasing within a run (late low values are
//!   clamped up, never reordered);
//! - the terminal update is emitted at most once, and nothing follows it.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::phase::Phase;

// ---------------------------------------------------------------------------
// Progress update
// ---------------------------------------------------------------------------

/// One progress notification within a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Which phase the run is in.
    pub phase: Phase,

    /// Human-readable status line.
    pub message: String,

    /// Linear progress, 0..=100, non-decreasing within a run.
    pub percentage: u8,
}

// ---------------------------------------------------------------------------
// Progress sink
// ---------------------------------------------------------------------------

struct SinkInner {
    /// Every update emitted during the run, in emission order.
    trail: Mutex<Vec<ProgressUpdate>>,

    /// Highest percentage emitted so far; later updates clamp up to it.
    last_percentage: AtomicU8,

    /// Set once the terminal update has been emitted.
    finished: AtomicBool,

    /// Zero-or-one registered observer.
    observer: Option<mpsc::UnboundedSender<ProgressUpdate>>,
}

/// Run-scoped handle for emitting progress updates.
///
/// Cheap to clone; all clones feed the same trail and observer.
#[derive(Clone)]
pub struct ProgressSink {
    inner: Arc<SinkInner>,
}

impl ProgressSink {
    /// Create a sink with no observer; updates are still recorded in the
    /// trail.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a sink together with a receiver the caller can drain live.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::build(Some(tx)), rx)
    }

    fn build(observer: Option<mpsc::UnboundedSender<ProgressUpdate>>) -> Self {
        Self {
            inner: Arc::new(SinkInner {
                trail: Mutex::new(Vec::new()),
                last_percentage: AtomicU8::new(0),
                finished: AtomicBool::new(false),
                observer,
            }),
        }
    }

    /// Emit an update at the phase's nominal percentage.
    pub fn emit(&self, phase: Phase, message: impl Into<String>) {
        self.emit_at(phase, message, phase.default_percentage());
    }

    /// Emit an update at an explicit percentage.
    pub fn emit_at(&self, phase: Phase, message: impl Into<String>, percentage: u8) {
        if phase.is_terminal() {
            // Terminal updates go through the at-most-once gate.
            self.finish(message);
            return;
        }

        if self.inner.finished.load(Ordering::SeqCst) {
            debug!(phase = %phase, "dropping progress update after terminal");
            return;
        }

        self.push(ProgressUpdate {
            phase,
            message: message.into(),
            percentage: percentage.min(100),
        });
    }

    /// Emit the terminal update at 100%.  Subsequent calls are no-ops, as
    /// are any updates emitted after this one.
    pub fn finish(&self, message: impl Into<String>) {
        if self.inner.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        self.push(ProgressUpdate {
            phase: Phase::Complete,
            message: message.into(),
            percentage: 100,
        });
    }

    fn push(&self, mut update: ProgressUpdate) {
        // Clamp and record under the trail lock: the clamp reads and
        // writes `last_percentage`, and without the lock two clones could
        // interleave and leave a decreasing pair in the trail.
        let Ok(mut trail) = self.inner.trail.lock() else {
            return;
        };

        let last = self.inner.last_percentage.load(Ordering::SeqCst);
        if update.percentage < last {
            update.percentage = last;
        }
        self.inner
            .last_percentage
            .store(update.percentage, Ordering::SeqCst);

        debug!(
            phase = %update.phase,
            percentage = update.percentage,
            message = %update.message,
            "progress"
        );

        trail.push(update.clone());

        // Observer gone (or never registered) is not an error.  Sending
        // while still holding the lock keeps the observer's order identical
        // to the trail's; the channel is unbounded, so this never blocks.
        if let Some(tx) = &self.inner.observer {
            let _ = tx.send(update);
        }
    }

    /// True once the terminal update has been emitted.
    pub fn is_finished(&self) -> bool {
        self.inner.finished.load(Ordering::SeqCst)
    }

    /// Snapshot of the trail in emission order.
    pub fn trail(&self) -> Vec<ProgressUpdate> {
        self.inner
            .trail
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

impl Default for ProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
