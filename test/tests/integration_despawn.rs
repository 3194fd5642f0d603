/// INTEGRATION TESTS: despawns, deleted components and stale operators
///
/// Key invariants:
/// 1. A despawned operator gets exactly one Despawned and no Removed
/// 2. Removals of deleted components resolve their kind from the cache
/// 3. Operators vanishing before apply are skipped, not reported
use opsync_shared::{
    ComponentKind, EcsChange, HandlerError, HandlerRegistry, HashWorld, SyncConfig, Synchronizer,
    World,
};
use opsync_test::{
    assert_tick_changes, assert_world_matches_graph, recording_synchronizer, CallLog,
    HandlerCall, RecordingHandler, TestGraph,
};

fn init_logger() {
    env_logger::builder().is_test(true).try_init().ok();
}

fn all_kinds() -> Vec<ComponentKind> {
    vec![ComponentKind::RANDOM, ComponentKind::SAMPLE, ComponentKind::APPLY]
}

#[test]
fn despawn_suppresses_removal() {
    init_logger();

    let mut graph = TestGraph::new();
    let operator = graph.create_operator();
    let random = graph.create_component(ComponentKind::RANDOM);
    let sample = graph.create_component(ComponentKind::SAMPLE);
    graph.attach(&random, &operator);
    graph.attach(&sample, &operator);
    let (mut sync, log) = recording_synchronizer(graph, &all_kinds());
    sync.tick().unwrap();
    log.take();

    // operator goes away and one of its components is deleted in the same tick
    sync.graph_mut().destroy_operator(&operator);
    sync.graph_mut().delete_component(&random);
    assert_tick_changes!(sync, [EcsChange::Despawned(operator)]);

    let mut calls = log.calls();
    calls.sort_by_key(|call| format!("{:?}", call));
    assert_eq!(
        calls,
        vec![
            HandlerCall::Remove(operator, ComponentKind::RANDOM),
            HandlerCall::Remove(operator, ComponentKind::SAMPLE),
        ]
    );
    assert!(sync.world().is_empty());
}

#[test]
fn despawn_is_emitted_once_per_dead_operator() {
    init_logger();

    let mut graph = TestGraph::new();
    let ops: Vec<_> = (0..3).map(|_| graph.create_operator()).collect();
    let components: Vec<_> = all_kinds()
        .into_iter()
        .map(|kind| graph.create_component(kind))
        .collect();
    for component in &components {
        for operator in &ops {
            graph.attach(component, operator);
        }
    }
    let (mut sync, _log) = recording_synchronizer(graph, &all_kinds());
    assert_eq!(sync.tick().unwrap().changes.len(), 9);

    sync.graph_mut().destroy_operator(&ops[0]);
    sync.graph_mut().destroy_operator(&ops[2]);
    assert_tick_changes!(
        sync,
        [EcsChange::Despawned(ops[0]), EcsChange::Despawned(ops[2])]
    );
    assert_world_matches_graph!(sync);
}

#[test]
fn dangling_reference_to_dead_operator_only_despawns() {
    init_logger();

    let mut graph = TestGraph::new();
    let operator = graph.create_operator();
    let component = graph.create_component(ComponentKind::APPLY);
    graph.attach(&component, &operator);
    let (mut sync, _log) = recording_synchronizer(graph, &all_kinds());
    sync.tick().unwrap();

    // the component still lists the operator after it was destroyed
    sync.graph_mut().destroy_operator_keep_refs(&operator);
    assert_tick_changes!(sync, [EcsChange::Despawned(operator)]);
    assert!(!sync.world().has_operator(&operator));
}

#[test]
fn deleted_component_kind_survives_in_cache() {
    init_logger();

    let mut graph = TestGraph::new();
    let op_1 = graph.create_operator();
    let op_2 = graph.create_operator();
    let component = graph.create_component(ComponentKind::SAMPLE);
    graph.attach(&component, &op_1);
    graph.attach(&component, &op_2);
    let (mut sync, _log) = recording_synchronizer(graph, &all_kinds());
    sync.tick().unwrap();

    sync.graph_mut().delete_component(&component);
    assert_tick_changes!(
        sync,
        [
            EcsChange::Removed(op_1, ComponentKind::SAMPLE),
            EcsChange::Removed(op_2, ComponentKind::SAMPLE),
        ]
    );
    assert!(sync.world().is_empty());
}

#[test]
fn unreadable_kind_is_picked_up_once_readable() {
    init_logger();

    let mut graph = TestGraph::new();
    let operator = graph.create_operator();
    let component = graph.create_component(ComponentKind::RANDOM);
    graph.attach(&component, &operator);
    graph.hide_kind(&component);
    let (mut sync, _log) = recording_synchronizer(graph, &all_kinds());

    assert_tick_changes!(sync, []);

    sync.graph_mut().reveal_kind(&component);
    assert_tick_changes!(sync, [EcsChange::Inserted(operator, ComponentKind::RANDOM)]);
}

#[test]
fn unreadable_kind_falls_back_to_cached_kind() {
    init_logger();

    let mut graph = TestGraph::new();
    let op_1 = graph.create_operator();
    let op_2 = graph.create_operator();
    let component = graph.create_component(ComponentKind::APPLY);
    graph.attach(&component, &op_1);
    let (mut sync, _log) = recording_synchronizer(graph, &all_kinds());
    sync.tick().unwrap();

    sync.graph_mut().hide_kind(&component);
    sync.graph_mut().attach(&component, &op_2);
    assert_tick_changes!(sync, [EcsChange::Inserted(op_2, ComponentKind::APPLY)]);
}

#[test]
fn insert_for_vanished_operator_is_stale() {
    init_logger();

    let mut graph = TestGraph::new();
    let operator = graph.create_operator();
    let component = graph.create_component(ComponentKind::RANDOM);
    graph.attach(&component, &operator);
    graph.destroy_operator_keep_refs(&operator);
    let (mut sync, log) = recording_synchronizer(graph, &all_kinds());

    let report = sync.tick().unwrap();
    assert_eq!(report.changes, vec![EcsChange::Inserted(operator, ComponentKind::RANDOM)]);
    assert_eq!(report.stale, 1);
    assert!(!report.has_errors());
    assert!(log.calls().is_empty());
    assert!(sync.world().is_empty());
}

#[test]
fn handler_reporting_stale_operator_is_rolled_back() {
    init_logger();

    let mut graph = TestGraph::new();
    let operator = graph.create_operator();
    let component = graph.create_component(ComponentKind::SAMPLE);
    graph.attach(&component, &operator);

    let log = CallLog::new();
    let mut registry = HandlerRegistry::new();
    registry
        .register(
            ComponentKind::SAMPLE,
            RecordingHandler::new(ComponentKind::SAMPLE, log.clone())
                .failing(HandlerError::StaleOperator),
        )
        .unwrap();
    let world = World::new(HashWorld::new(), registry);
    let mut sync = Synchronizer::new(graph, world, SyncConfig::default());

    let report = sync.tick().unwrap();
    assert_eq!(report.stale, 1);
    assert!(!sync.world().has_operator(&operator));
}
