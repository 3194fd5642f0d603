//! # Opsync Shared
//! Mirrors an externally-owned graph of operators, and the components attached
//! to them, into an ECS world by diffing successive scans of the graph.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod sync;
mod types;
mod world;

pub use sync::{
    observer::{LogObserver, NoopObserver, SyncObserver},
    sync_config::SyncConfig,
    synchronizer::Synchronizer,
    tick_report::TickReport,
};
pub use types::{ComponentId, OperatorId};
pub use world::{
    change::{EcsChange, EcsChangeType},
    component::{
        builtin::{
            reduce, register_builtins, ApplyConfig, ApplyHandler, BuiltinConfig, RandomConfig,
            RandomHandler, SampleConfig, SampleHandler, Sampler, Strat,
        },
        component_kind::ComponentKind,
    },
    differ::{Diff, DiffState, SnapshotDiffer},
    ecs_world::{ApplyOutcome, World},
    error::{HandlerError, SyncError},
    graph::OperatorGraph,
    handler::{AsAny, ComponentHandler, HandlerRegistry},
    hash_world::HashWorld,
    snapshot::Snapshot,
    world_type::{WorldMutType, WorldRefType},
};
