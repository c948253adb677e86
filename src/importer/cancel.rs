// ==========================================
// Trade Import - Cancellation Token
// ==========================================
// Cooperative cancellation for long-running jobs. The orchestrator
// checks the token at every row and at every batch boundary, since a
// single job can process unbounded row counts.
// ==========================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheap, clonable cancellation flag shared between a job submitter
/// and the running orchestrator task.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; takes effect at the next
    /// row or batch boundary check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
