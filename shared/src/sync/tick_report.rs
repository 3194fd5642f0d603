use crate::{ApplyOutcome, EcsChange, SyncError};

/// What one successful tick of the Synchronizer did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Changes in the order they were applied
    pub changes: Vec<EcsChange>,
    pub applied: usize,
    pub unchanged: usize,
    pub stale: usize,
    /// Isolated errors, one per change that could not be applied
    pub errors: Vec<SyncError>,
}

impl TickReport {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, change: EcsChange, outcome: Result<ApplyOutcome, SyncError>) {
        match outcome {
            Ok(ApplyOutcome::Applied) => self.applied += 1,
            Ok(ApplyOutcome::Unchanged) => self.unchanged += 1,
            Ok(ApplyOutcome::Stale) => self.stale += 1,
            Err(error) => self.errors.push(error),
        }
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
