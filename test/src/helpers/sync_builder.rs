use opsync_bevy::{register_bevy_handlers, BevyWorld};
use opsync_shared::{
    register_builtins, ComponentKind, HandlerRegistry, HashWorld, SyncConfig, Synchronizer, World,
};

use crate::{helpers::recording_handler::{CallLog, RecordingHandler}, TestGraph};

/// Synchronizer over a HashWorld with a RecordingHandler for each of `kinds`,
/// all writing to the returned log.
pub fn recording_synchronizer(
    graph: TestGraph,
    kinds: &[ComponentKind],
) -> (Synchronizer<TestGraph, HashWorld>, CallLog) {
    let log = CallLog::new();
    let mut registry = HandlerRegistry::new();
    for kind in kinds {
        registry
            .register(kind.clone(), RecordingHandler::new(kind.clone(), log.clone()))
            .unwrap();
    }
    let world = World::new(HashWorld::new(), registry);
    (Synchronizer::new(graph, world, SyncConfig::default()), log)
}

/// Synchronizer over a HashWorld with the built-in kinds registered.
pub fn builtin_synchronizer(graph: TestGraph) -> Synchronizer<TestGraph, HashWorld> {
    let config = SyncConfig::default();
    let mut registry = HandlerRegistry::new();
    register_builtins(&mut registry, &config.builtins).unwrap();
    Synchronizer::new(graph, World::new(HashWorld::new(), registry), config)
}

/// Synchronizer over a Bevy world with the Bevy handlers registered.
pub fn bevy_synchronizer(graph: TestGraph, config: SyncConfig) -> Synchronizer<TestGraph, BevyWorld> {
    let mut registry = HandlerRegistry::new();
    register_bevy_handlers(&mut registry, &config.builtins).unwrap();
    Synchronizer::new(graph, World::new(BevyWorld::new(), registry), config)
}
