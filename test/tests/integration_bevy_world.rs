/// INTEGRATION TESTS: Bevy backed World
///
/// Runs the Synchronizer over a BevyWorld and checks the typed Bevy
/// components the built-in kinds leave on each operator's entity.
use std::time::Duration;

use opsync_bevy::{Apply, BevyWorld, Op, OpComponents, Random, Sample, WorldRefType};
use opsync_shared::{ApplyConfig, BuiltinConfig, ComponentKind, EcsChange, Strat, SyncConfig};
use opsync_test::{assert_tick_changes, assert_world_matches_graph, bevy_synchronizer, TestGraph};

fn init_logger() {
    env_logger::builder().is_test(true).try_init().ok();
}

fn config() -> SyncConfig {
    SyncConfig {
        log_changes: true,
        builtins: BuiltinConfig {
            apply: ApplyConfig {
                filter: "level".to_string(),
                strat: Strat::Max,
            },
            ..Default::default()
        },
    }
}

#[test]
fn builtin_kinds_become_bevy_components() {
    init_logger();

    let mut graph = TestGraph::new();
    let operator = graph.create_operator();
    let random = graph.create_component(ComponentKind::RANDOM);
    let sample = graph.create_component(ComponentKind::SAMPLE);
    graph.attach(&random, &operator);
    graph.attach(&sample, &operator);
    let mut sync = bevy_synchronizer(graph, config());

    sync.tick().unwrap();
    assert_world_matches_graph!(sync);

    let storage: &BevyWorld = sync.world().storage();
    assert_eq!(storage.component::<Op>(&operator), Some(&Op { id: operator }));
    let random_component = storage.component::<Random>(&operator).unwrap();
    assert_eq!(random_component.parameter, "gain");
    assert_eq!(random_component.range, 0.0..2.0);
    assert_eq!(
        storage.component::<Sample>(&operator).map(|sample| sample.0.interval()),
        Some(Duration::from_secs(1))
    );
    assert_eq!(
        storage.component_kinds(&operator),
        vec![ComponentKind::RANDOM, ComponentKind::SAMPLE]
    );

    sync.graph_mut().detach(&random, &operator);
    assert_tick_changes!(sync, [EcsChange::Removed(operator, ComponentKind::RANDOM)]);
    let storage = sync.world().storage();
    assert!(storage.component::<Random>(&operator).is_none());
    assert!(storage.component::<Sample>(&operator).is_some());
    assert!(storage
        .component::<OpComponents>(&operator)
        .is_some_and(|components| !components.contains(&ComponentKind::RANDOM)));
}

#[test]
fn despawn_removes_bevy_entity() {
    init_logger();

    let mut graph = TestGraph::new();
    let operator = graph.create_operator();
    let apply = graph.create_component(ComponentKind::APPLY);
    graph.attach(&apply, &operator);
    let mut sync = bevy_synchronizer(graph, config());
    sync.tick().unwrap();

    let entity = sync.world().storage().entity(&operator).unwrap();
    assert!(sync.world().storage().world().get_entity(entity).is_ok());

    sync.graph_mut().destroy_operator(&operator);
    assert_tick_changes!(sync, [EcsChange::Despawned(operator)]);
    assert!(sync.world().storage().entity(&operator).is_none());
    assert!(sync.world().storage().world().get_entity(entity).is_err());
}

#[test]
fn samplers_feed_appliers() {
    init_logger();

    let mut graph = TestGraph::new();
    let source_a = graph.create_operator();
    let source_b = graph.create_operator();
    let target = graph.create_operator();
    let sample = graph.create_component(ComponentKind::SAMPLE);
    let apply = graph.create_component(ComponentKind::APPLY);
    graph.attach(&sample, &source_a);
    graph.attach(&sample, &source_b);
    graph.attach(&apply, &target);
    let mut sync = bevy_synchronizer(graph, config());
    sync.tick().unwrap();

    let storage = sync.world_mut().storage_mut();
    assert!(storage.due_samplers(Duration::from_millis(400)).is_empty());
    assert_eq!(
        storage.due_samplers(Duration::from_millis(600)),
        vec![source_a, source_b]
    );

    assert!(storage.record_sample(&source_a, [("level1", 0.25), ("gain", 1.5)]));
    assert!(storage.record_sample(&source_b, [("level1", 0.75)]));
    assert!(!storage.record_sample(&target, [("level1", 1.0)]));

    let targets = storage.apply_targets();
    assert_eq!(targets.len(), 1);
    let (operator, values) = &targets[0];
    assert_eq!(*operator, target);
    assert_eq!(values.get("level1"), Some(&0.75));
    assert!(!values.contains_key("gain"));

    let storage = sync.world().storage();
    assert_eq!(
        storage.component::<Apply>(&target).map(|apply| apply.strat),
        Some(Strat::Max)
    );
}
