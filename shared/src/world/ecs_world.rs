use log::{debug, warn};

use crate::{
    ComponentKind, EcsChange, HandlerError, HandlerRegistry, OperatorGraph, OperatorId, SyncError,
    WorldMutType,
};

/// What applying a single change did to the World.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// State changed and the kind handler ran
    Applied,
    /// The change was already reflected in the World
    Unchanged,
    /// The operator vanished before the change could be applied
    Stale,
}

/// Entity/component store keyed by operator id. Only mutated by applying
/// [`EcsChange`]s; dispatches each one to the handler of its component kind.
pub struct World<W: WorldMutType> {
    storage: W,
    registry: HandlerRegistry<W>,
}

impl<W: WorldMutType> World<W> {
    pub fn new(storage: W, registry: HandlerRegistry<W>) -> Self {
        Self { storage, registry }
    }

    pub fn storage(&self) -> &W {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut W {
        &mut self.storage
    }

    pub fn registry(&self) -> &HandlerRegistry<W> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HandlerRegistry<W> {
        &mut self.registry
    }

    // Queries //

    pub fn has_operator(&self, operator: &OperatorId) -> bool {
        self.storage.has_entity(operator)
    }

    pub fn has_component(&self, operator: &OperatorId, kind: &ComponentKind) -> bool {
        self.storage.has_component_of_kind(operator, kind)
    }

    pub fn operators(&self) -> Vec<OperatorId> {
        self.storage.entities()
    }

    pub fn components_of(&self, operator: &OperatorId) -> Vec<ComponentKind> {
        self.storage.component_kinds(operator)
    }

    pub fn operators_with(&self, kind: &ComponentKind) -> Vec<OperatorId> {
        self.storage
            .entities()
            .into_iter()
            .filter(|operator| self.storage.has_component_of_kind(operator, kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.storage.entities().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Changes //

    pub fn apply<G: OperatorGraph + ?Sized>(
        &mut self,
        graph: &G,
        change: &EcsChange,
    ) -> Result<ApplyOutcome, SyncError> {
        match change {
            EcsChange::Inserted(operator, kind) => self.insert(graph, operator, kind),
            EcsChange::Removed(operator, kind) => self.remove(operator, kind),
            EcsChange::Despawned(operator) => Ok(self.despawn(operator)),
        }
    }

    /// Undoes a change applied earlier in the same tick.
    ///
    /// Despawns are left alone: the operator is gone from the graph, and
    /// replaying its despawn later finds nothing to do.
    pub fn revert<G: OperatorGraph + ?Sized>(
        &mut self,
        graph: &G,
        change: &EcsChange,
    ) -> Result<ApplyOutcome, SyncError> {
        match change {
            EcsChange::Inserted(operator, kind) => self.remove(operator, kind),
            EcsChange::Removed(operator, kind) => self.insert(graph, operator, kind),
            EcsChange::Despawned(_) => Ok(ApplyOutcome::Unchanged),
        }
    }

    fn insert<G: OperatorGraph + ?Sized>(
        &mut self,
        graph: &G,
        operator: &OperatorId,
        kind: &ComponentKind,
    ) -> Result<ApplyOutcome, SyncError> {
        if !graph.exists(operator) {
            debug!("World: {} vanished before insert of '{}'", operator, kind);
            return Ok(ApplyOutcome::Stale);
        }
        let Some(handler) = self.registry.dispatch(kind) else {
            return Err(SyncError::UnknownKind {
                operator: *operator,
                kind: kind.clone(),
            });
        };
        if self.storage.has_component_of_kind(operator, kind) {
            return Err(SyncError::DuplicateInsert {
                operator: *operator,
                kind: kind.clone(),
            });
        }

        let spawned = !self.storage.has_entity(operator);
        if spawned {
            self.storage.spawn_entity(operator);
        }
        self.storage.insert_component_kind(operator, kind);

        let result = handler.on_insert(&mut self.storage, operator);
        if result.is_err() {
            // the handler never took ownership of the operator, undo the bookkeeping
            self.storage.remove_component_kind(operator, kind);
            if spawned {
                self.storage.despawn_entity(operator);
            }
        }
        match result {
            Ok(()) => Ok(ApplyOutcome::Applied),
            Err(HandlerError::StaleOperator) => {
                debug!("World: {} went stale during insert of '{}'", operator, kind);
                Ok(ApplyOutcome::Stale)
            }
            Err(source) => Err(SyncError::Handler {
                operator: *operator,
                kind: kind.clone(),
                source,
            }),
        }
    }

    fn remove(
        &mut self,
        operator: &OperatorId,
        kind: &ComponentKind,
    ) -> Result<ApplyOutcome, SyncError> {
        let Some(handler) = self.registry.dispatch(kind) else {
            return Err(SyncError::UnknownKind {
                operator: *operator,
                kind: kind.clone(),
            });
        };
        if !self.storage.has_component_of_kind(operator, kind) {
            return Ok(ApplyOutcome::Unchanged);
        }

        let result = handler.on_remove(&mut self.storage, operator);
        self.storage.remove_component_kind(operator, kind);
        if self.storage.component_kinds(operator).is_empty() {
            self.storage.despawn_entity(operator);
        }

        match result {
            Ok(()) | Err(HandlerError::StaleOperator) => Ok(ApplyOutcome::Applied),
            Err(source) => Err(SyncError::Handler {
                operator: *operator,
                kind: kind.clone(),
                source,
            }),
        }
    }

    fn despawn(&mut self, operator: &OperatorId) -> ApplyOutcome {
        if !self.storage.has_entity(operator) {
            return ApplyOutcome::Unchanged;
        }

        for kind in self.storage.component_kinds(operator) {
            if let Some(handler) = self.registry.dispatch(&kind) {
                match handler.on_remove(&mut self.storage, operator) {
                    Ok(()) | Err(HandlerError::StaleOperator) => {}
                    Err(error) => {
                        warn!("World: '{}' handler failed while despawning {}: {}", kind, operator, error);
                    }
                }
            }
            self.storage.remove_component_kind(operator, &kind);
        }
        self.storage.despawn_entity(operator);

        ApplyOutcome::Applied
    }
}
