use log::{debug, info, warn};

use crate::{
    ApplyOutcome, EcsChange, LogObserver, OperatorGraph, SnapshotDiffer, SyncConfig, SyncError,
    SyncObserver, TickReport, World, WorldMutType,
};

/// Drives one scan → diff → apply cycle per call to [`Synchronizer::tick`].
pub struct Synchronizer<G: OperatorGraph, W: WorldMutType> {
    graph: G,
    differ: SnapshotDiffer,
    world: World<W>,
    config: SyncConfig,
    observer: Box<dyn SyncObserver>,
    tick: u64,
}

impl<G: OperatorGraph, W: WorldMutType> Synchronizer<G, W> {
    pub fn new(graph: G, world: World<W>, config: SyncConfig) -> Self {
        Self {
            graph,
            differ: SnapshotDiffer::new(),
            world,
            config,
            observer: Box::new(LogObserver),
            tick: 0,
        }
    }

    pub fn with_observer<O: SyncObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// The host mutates the graph through this between ticks.
    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }

    pub fn world(&self) -> &World<W> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<W> {
        &mut self.world
    }

    pub fn differ(&self) -> &SnapshotDiffer {
        &self.differ
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Number of ticks run so far, committed or not.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Brings the World in line with the graph.
    ///
    /// Errors isolated to one change are collected in the returned report. A
    /// structural error stops the tick before the differ state is committed
    /// and undoes the changes this tick already made to the World, so the
    /// next tick diffs against the last good snapshot again.
    pub fn tick(&mut self) -> Result<TickReport, SyncError> {
        self.tick += 1;
        let tick = self.tick;

        let current = SnapshotDiffer::scan(&self.graph);
        let (changes, next_state) = self.differ.diff(&self.graph, current).into_parts();

        let mut report = TickReport::new(tick);
        let mut undo = Vec::new();
        for change in changes {
            if self.config.log_changes {
                info!("Synchronizer: {}", change);
            }
            self.observer.on_change(tick, &change);

            let outcome = self.world.apply(&self.graph, &change);
            if let Err(error) = &outcome {
                self.observer.on_error(tick, error);
                if error.is_structural() {
                    warn!("Synchronizer: tick {} aborted without commit: {}", tick, error);
                    self.roll_back(tick, undo);
                    return Err(error.clone());
                }
            }
            if touched_world(&change, &outcome) {
                undo.push(change.clone());
            }
            report.record(change, outcome);
        }

        self.differ.commit(next_state);
        self.observer.on_tick(&report);
        Ok(report)
    }

    // Newest first, so each undo sees the World as its change left it
    fn roll_back(&mut self, tick: u64, undo: Vec<EcsChange>) {
        for change in undo.into_iter().rev() {
            match self.world.revert(&self.graph, &change) {
                Ok(_) => debug!("Synchronizer: reverted {}", change),
                Err(error) => warn!(
                    "Synchronizer: could not revert {} after aborted tick {}: {}",
                    change, tick, error
                ),
            }
        }
    }
}

// A failed remove handler still drops the kind from the World
fn touched_world(change: &EcsChange, outcome: &Result<ApplyOutcome, SyncError>) -> bool {
    match (change, outcome) {
        (_, Ok(ApplyOutcome::Applied)) => true,
        (EcsChange::Removed(..), Err(SyncError::Handler { .. })) => true,
        _ => false,
    }
}
