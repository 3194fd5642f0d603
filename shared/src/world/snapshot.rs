use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::{ComponentId, OperatorId};

/// Component → attached operators, as captured by one scan of the graph.
///
/// Components iterate in ascending id order. Each operator list keeps the
/// order operators were first seen in and never holds the same operator twice.
/// A component with an empty operator list still exists: it is attached to
/// nothing, which is different from being deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    components: BTreeMap<ComponentId, Attached>,
}

// Ordered operator list plus a set for constant time membership checks
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Attached {
    order: Vec<OperatorId>,
    seen: HashSet<OperatorId>,
}

impl Attached {
    fn push(&mut self, operator: OperatorId) {
        if self.seen.insert(operator) {
            self.order.push(operator);
        }
    }
}

impl Snapshot {
    pub fn new() -> Self {
        Self {
            components: BTreeMap::new(),
        }
    }

    /// Sets the operators attached to `component`, replacing any previous entry.
    pub fn insert(
        &mut self,
        component: ComponentId,
        operators: impl IntoIterator<Item = OperatorId>,
    ) {
        let mut attached = Attached::default();
        for operator in operators {
            attached.push(operator);
        }
        self.components.insert(component, attached);
    }

    /// Attaches one operator to `component`, creating the entry if needed.
    pub fn attach(&mut self, component: ComponentId, operator: OperatorId) {
        self.components.entry(component).or_default().push(operator);
    }

    pub fn remove(&mut self, component: &ComponentId) -> Option<Vec<OperatorId>> {
        self.components
            .remove(component)
            .map(|attached| attached.order)
    }

    pub fn contains_component(&self, component: &ComponentId) -> bool {
        self.components.contains_key(component)
    }

    pub fn operators(&self, component: &ComponentId) -> Option<&[OperatorId]> {
        self.components
            .get(component)
            .map(|attached| attached.order.as_slice())
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentId> {
        self.components.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, &[OperatorId])> {
        self.components
            .iter()
            .map(|(component, attached)| (component, attached.order.as_slice()))
    }

    /// Every operator attached to at least one component.
    pub fn live_operators(&self) -> BTreeSet<OperatorId> {
        self.components
            .values()
            .flat_map(|attached| attached.order.iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl FromIterator<(ComponentId, Vec<OperatorId>)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (ComponentId, Vec<OperatorId>)>>(iter: T) -> Self {
        let mut snapshot = Snapshot::new();
        for (component, operators) in iter {
            snapshot.insert(component, operators);
        }
        snapshot
    }
}
