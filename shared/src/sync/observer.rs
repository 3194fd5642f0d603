use log::{debug, info, warn};

use crate::{EcsChange, SyncError, TickReport};

/// Hooks into each tick of a [`Synchronizer`](crate::Synchronizer).
pub trait SyncObserver {
    fn on_change(&mut self, _tick: u64, _change: &EcsChange) {}
    fn on_error(&mut self, _tick: u64, _error: &SyncError) {}
    fn on_tick(&mut self, _report: &TickReport) {}
}

pub struct NoopObserver;

impl SyncObserver for NoopObserver {}

/// Forwards tick activity to the `log` facade.
#[derive(Default)]
pub struct LogObserver;

impl SyncObserver for LogObserver {
    fn on_change(&mut self, tick: u64, change: &EcsChange) {
        debug!("[tick {}] {}", tick, change.log());
    }

    fn on_error(&mut self, tick: u64, error: &SyncError) {
        warn!("[tick {}] {}", tick, error);
    }

    fn on_tick(&mut self, report: &TickReport) {
        if report.is_empty() {
            return;
        }
        info!(
            "[tick {}] {} changes: {} applied, {} unchanged, {} stale, {} failed",
            report.tick,
            report.changes.len(),
            report.applied,
            report.unchanged,
            report.stale,
            report.errors.len()
        );
    }
}
