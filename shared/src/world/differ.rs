use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, warn};

use crate::{ComponentId, ComponentKind, EcsChange, OperatorGraph, OperatorId, Snapshot};

/// Everything the differ remembers between ticks.
///
/// Replaced as a whole when a tick commits, never edited in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffState {
    // Component → operators it was attached to at the last committed scan
    last_components: Snapshot,
    // Every component kind ever read, so removals resolve after deletion
    known_instances: HashMap<ComponentId, ComponentKind>,
    // Operators that had at least one component at the last committed scan
    last_ops: BTreeSet<OperatorId>,
}

impl DiffState {
    pub fn last_components(&self) -> &Snapshot {
        &self.last_components
    }

    pub fn known_kind(&self, component: &ComponentId) -> Option<&ComponentKind> {
        self.known_instances.get(component)
    }

    pub fn last_ops(&self) -> &BTreeSet<OperatorId> {
        &self.last_ops
    }
}

/// The output of one diff: the ordered change list, plus the state to commit
/// once those changes have been applied.
#[derive(Debug)]
pub struct Diff {
    changes: Vec<EcsChange>,
    next_state: DiffState,
}

impl Diff {
    pub fn changes(&self) -> &[EcsChange] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn into_parts(self) -> (Vec<EcsChange>, DiffState) {
        (self.changes, self.next_state)
    }
}

pub struct SnapshotDiffer {
    state: DiffState,
}

impl Default for SnapshotDiffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotDiffer {
    pub fn new() -> Self {
        Self {
            state: DiffState::default(),
        }
    }

    pub fn state(&self) -> &DiffState {
        &self.state
    }

    /// Reads the current component → operator attachments from the graph.
    pub fn scan<G: OperatorGraph + ?Sized>(graph: &G) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for component in graph.list_components() {
            snapshot.insert(component, graph.operators_referencing(&component));
        }
        snapshot
    }

    /// Computes the changes from the committed state to `current` without
    /// touching the committed state.
    ///
    /// Changes come out in this order: despawns, removals caused by deleted
    /// components, then per component its inserts followed by its removals.
    /// An operator despawned this tick never also gets a `Removed` change. A
    /// component whose kind changed is removed under the old kind and
    /// inserted under the new one. When one tick both removes and inserts the
    /// same (operator, kind) pair, as when a kind moves from one component to
    /// another, the two cancel out and neither is emitted.
    pub fn diff<G: OperatorGraph + ?Sized>(&self, graph: &G, current: Snapshot) -> Diff {
        let last = &self.state;
        let mut changes = Vec::new();
        let mut known_instances = last.known_instances.clone();

        // Despawns are judged against the pre-tick live set and must be known
        // before any removal is emitted.
        let mut deleted_last_ops = HashSet::new();
        for operator in &last.last_ops {
            if !graph.exists(operator) {
                changes.push(EcsChange::Despawned(*operator));
                deleted_last_ops.insert(*operator);
            }
        }

        // Components deleted from the graph since the last scan
        for (component, operators) in last.last_components.iter() {
            if current.contains_component(component) {
                continue;
            }
            let Some(kind) = known_instances.get(component) else {
                debug!("Differ: dropping removal of {} with unknown kind", component);
                continue;
            };
            for operator in operators {
                if !deleted_last_ops.contains(operator) {
                    changes.push(EcsChange::Removed(*operator, kind.clone()));
                }
            }
        }

        // Attachment deltas of components that still exist
        let mut next_components = Snapshot::new();
        for (component, operators) in current.iter() {
            let kind = match graph.kind_of(component) {
                Some(kind) => kind,
                None => match known_instances.get(component) {
                    Some(kind) => kind.clone(),
                    None => {
                        // left out of the committed snapshot so it shows up as new next tick
                        warn!("Differ: cannot read kind of {}, skipping it this tick", component);
                        continue;
                    }
                },
            };
            // attachments from the last scan carry the kind the World was given then
            let previous_kind = known_instances
                .insert(*component, kind.clone())
                .unwrap_or_else(|| kind.clone());

            let previous = last.last_components.operators(component).unwrap_or(&[]);
            let previous_set: HashSet<&OperatorId> = previous.iter().collect();
            let current_set: HashSet<&OperatorId> = operators.iter().collect();
            let kind_changed = previous_kind != kind;
            if kind_changed && !previous.is_empty() {
                debug!(
                    "Differ: {} changed kind from {} to {}",
                    component, previous_kind, kind
                );
            }

            for operator in operators {
                if !previous_set.contains(operator) || kind_changed {
                    changes.push(EcsChange::Inserted(*operator, kind.clone()));
                }
            }
            for operator in previous {
                if deleted_last_ops.contains(operator) {
                    continue;
                }
                if !current_set.contains(operator) || kind_changed {
                    changes.push(EcsChange::Removed(*operator, previous_kind.clone()));
                }
            }

            next_components.insert(*component, operators.iter().copied());
        }

        let changes = cancel_moves(changes);
        let last_ops = next_components.live_operators();
        Diff {
            changes,
            next_state: DiffState {
                last_components: next_components,
                known_instances,
                last_ops,
            },
        }
    }

    /// Makes `state` the baseline for the next diff.
    pub fn commit(&mut self, state: DiffState) {
        self.state = state;
    }

    /// Diffs against `current` and commits straight away.
    pub fn compute_changes<G: OperatorGraph + ?Sized>(
        &mut self,
        graph: &G,
        current: Snapshot,
    ) -> Vec<EcsChange> {
        let (changes, next_state) = self.diff(graph, current).into_parts();
        self.commit(next_state);
        changes
    }
}

// Drops matched Removed/Inserted pairs for the same (operator, kind)
fn cancel_moves(changes: Vec<EcsChange>) -> Vec<EcsChange> {
    let mut counts: HashMap<(OperatorId, ComponentKind), (usize, usize)> = HashMap::new();
    for change in &changes {
        match change {
            EcsChange::Removed(operator, kind) => {
                counts.entry((*operator, kind.clone())).or_default().0 += 1
            }
            EcsChange::Inserted(operator, kind) => {
                counts.entry((*operator, kind.clone())).or_default().1 += 1
            }
            EcsChange::Despawned(_) => {}
        }
    }

    // how many of each side are still to be dropped
    let mut budget: HashMap<(OperatorId, ComponentKind), (usize, usize)> = counts
        .into_iter()
        .filter_map(|(pair, (removed, inserted))| {
            let matched = removed.min(inserted);
            (matched > 0).then_some((pair, (matched, matched)))
        })
        .collect();
    if budget.is_empty() {
        return changes;
    }

    changes
        .into_iter()
        .filter(|change| {
            let (pair, inserted) = match change {
                EcsChange::Removed(operator, kind) => ((*operator, kind.clone()), false),
                EcsChange::Inserted(operator, kind) => ((*operator, kind.clone()), true),
                EcsChange::Despawned(_) => return true,
            };
            let Some((removals, inserts)) = budget.get_mut(&pair) else {
                return true;
            };
            let left = if inserted { inserts } else { removals };
            if *left == 0 {
                return true;
            }
            *left -= 1;
            debug!("Differ: {} cancelled by a matching change", change);
            false
        })
        .collect()
}
