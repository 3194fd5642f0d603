use std::{cell::RefCell, rc::Rc};

use opsync_shared::{EcsChange, SyncError, SyncObserver, TickReport};

#[derive(Clone, Debug, Default)]
pub struct ObservedEvents {
    pub changes: Vec<(u64, EcsChange)>,
    pub errors: Vec<(u64, SyncError)>,
    pub reports: Vec<TickReport>,
}

/// Observer whose events stay readable after it is handed to a Synchronizer
#[derive(Clone, Default)]
pub struct RecordingObserver(Rc<RefCell<ObservedEvents>>);

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> ObservedEvents {
        self.0.borrow().clone()
    }
}

impl SyncObserver for RecordingObserver {
    fn on_change(&mut self, tick: u64, change: &EcsChange) {
        self.0.borrow_mut().changes.push((tick, change.clone()));
    }

    fn on_error(&mut self, tick: u64, error: &SyncError) {
        self.0.borrow_mut().errors.push((tick, error.clone()));
    }

    fn on_tick(&mut self, report: &TickReport) {
        self.0.borrow_mut().reports.push(report.clone());
    }
}
