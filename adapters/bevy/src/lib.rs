pub use opsync_shared::{
    reduce, ApplyConfig, BuiltinConfig, ComponentHandler, ComponentId, ComponentKind, EcsChange,
    HandlerError, HandlerRegistry, OperatorGraph, OperatorId, RandomConfig, SampleConfig, Sampler,
    Strat, SyncConfig, SyncError, Synchronizer, World, WorldMutType, WorldRefType,
};

mod bevy_world;
mod components;
mod handlers;

pub use bevy_world::BevyWorld;
pub use components::{Apply, Op, OpComponents, Random, Sample};
pub use handlers::{register_bevy_handlers, ComponentInserter};
