use crate::{ComponentKind, OperatorId};

/// Read access to the storage backing a [`World`](crate::World).
///
/// Entities are keyed by operator id. An entity exists while at least one
/// component kind is recorded on it.
pub trait WorldRefType {
    fn has_entity(&self, operator: &OperatorId) -> bool;
    fn entities(&self) -> Vec<OperatorId>;
    fn has_component_of_kind(&self, operator: &OperatorId, kind: &ComponentKind) -> bool;
    fn component_kinds(&self, operator: &OperatorId) -> Vec<ComponentKind>;
}

/// Mutating access to the storage backing a [`World`](crate::World).
///
/// Implementations only keep the bookkeeping; dispatch to kind handlers is
/// done by the World.
pub trait WorldMutType: WorldRefType {
    fn spawn_entity(&mut self, operator: &OperatorId);
    fn despawn_entity(&mut self, operator: &OperatorId);
    fn insert_component_kind(&mut self, operator: &OperatorId, kind: &ComponentKind);
    /// Returns whether the kind was present.
    fn remove_component_kind(&mut self, operator: &OperatorId, kind: &ComponentKind) -> bool;
}
