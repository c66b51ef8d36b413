//! Progress reporting for batch passes.

/// Receives progress updates from enrichment and reconciliation.
pub trait ReconcileProgress {
    /// Called after each curated title is resolved.
    fn on_title(&self, current: usize, total: usize, title: &str);

    /// Called when a phase starts (e.g., "Resolving 412 titles").
    fn on_phase(&self, message: &str);

    /// Called when the pass is complete.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl ReconcileProgress for SilentProgress {
    fn on_title(&self, _current: usize, _total: usize, _title: &str) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl ReconcileProgress for LogProgress {
    fn on_title(&self, current: usize, total: usize, title: &str) {
        if current.is_multiple_of(50) || current == total {
            log::info!("  [{}/{}] {}", current, total, title);
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
