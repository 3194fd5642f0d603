use std::{collections::BTreeSet, ops::Range};

use bevy_ecs::component::Component;

use opsync_shared::{ComponentKind, OperatorId, Sampler, Strat};

/// Links a Bevy entity back to the operator it mirrors
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Op {
    pub id: OperatorId,
}

/// Component kinds currently recorded on the operator
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct OpComponents {
    kinds: BTreeSet<ComponentKind>,
}

impl OpComponents {
    pub fn kinds(&self) -> impl Iterator<Item = &ComponentKind> {
        self.kinds.iter()
    }

    pub fn contains(&self, kind: &ComponentKind) -> bool {
        self.kinds.contains(kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub(crate) fn insert(&mut self, kind: ComponentKind) {
        self.kinds.insert(kind);
    }

    pub(crate) fn remove(&mut self, kind: &ComponentKind) -> bool {
        self.kinds.remove(kind)
    }
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Random {
    pub parameter: String,
    pub range: Range<f32>,
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sample(pub Sampler);

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Apply {
    pub filter: String,
    pub strat: Strat,
}
