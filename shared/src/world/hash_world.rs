use std::collections::{BTreeMap, BTreeSet};

use crate::{ComponentKind, OperatorId, WorldMutType, WorldRefType};

// HashWorld - in-memory storage, one kind set per operator
#[derive(Clone, Debug, Default)]
pub struct HashWorld {
    entities: BTreeMap<OperatorId, BTreeSet<ComponentKind>>,
}

impl HashWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl WorldRefType for HashWorld {
    fn has_entity(&self, operator: &OperatorId) -> bool {
        self.entities.contains_key(operator)
    }

    fn entities(&self) -> Vec<OperatorId> {
        self.entities.keys().copied().collect()
    }

    fn has_component_of_kind(&self, operator: &OperatorId, kind: &ComponentKind) -> bool {
        self.entities
            .get(operator)
            .is_some_and(|kinds| kinds.contains(kind))
    }

    fn component_kinds(&self, operator: &OperatorId) -> Vec<ComponentKind> {
        self.entities
            .get(operator)
            .map(|kinds| kinds.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl WorldMutType for HashWorld {
    fn spawn_entity(&mut self, operator: &OperatorId) {
        self.entities.entry(*operator).or_default();
    }

    fn despawn_entity(&mut self, operator: &OperatorId) {
        self.entities.remove(operator);
    }

    fn insert_component_kind(&mut self, operator: &OperatorId, kind: &ComponentKind) {
        self.entities
            .entry(*operator)
            .or_default()
            .insert(kind.clone());
    }

    fn remove_component_kind(&mut self, operator: &OperatorId, kind: &ComponentKind) -> bool {
        self.entities
            .get_mut(operator)
            .is_some_and(|kinds| kinds.remove(kind))
    }
}
