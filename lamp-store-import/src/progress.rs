//! Import progress reporting.

use lamp_store_model::Resource;

/// Trait for receiving import progress updates.
pub trait ImportProgress {
    /// Called after each record of a resource is inserted.
    fn on_record(&self, resource: Resource, current: usize, total: usize);

    /// Called when a phase starts (e.g., "Importing books").
    fn on_phase(&self, message: &str);

    /// Called when a phase is complete.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_record(&self, _resource: Resource, _current: usize, _total: usize) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_record(&self, resource: Resource, current: usize, total: usize) {
        if current.is_multiple_of(1000) || current == total {
            log::info!("  [{}/{}] {}", current, total, resource.label());
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
