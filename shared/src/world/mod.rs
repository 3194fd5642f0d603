pub mod change;
pub mod component;
pub mod differ;
pub mod ecs_world;
pub mod error;
pub mod graph;
pub mod handler;
pub mod hash_world;
pub mod snapshot;
pub mod world_type;
