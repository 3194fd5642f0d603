use std::fmt;

use crate::{ComponentKind, OperatorId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EcsChangeType {
    Inserted,
    Removed,
    Despawned,
}

// ECS Lifecycle Changes
/// One step in moving the World from the previous scan to the current one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EcsChange {
    Inserted(OperatorId, ComponentKind),
    Removed(OperatorId, ComponentKind),
    Despawned(OperatorId),
}

impl EcsChange {
    pub fn change_type(&self) -> EcsChangeType {
        match self {
            Self::Inserted(_, _) => EcsChangeType::Inserted,
            Self::Removed(_, _) => EcsChangeType::Removed,
            Self::Despawned(_) => EcsChangeType::Despawned,
        }
    }

    pub fn operator(&self) -> OperatorId {
        match self {
            Self::Inserted(operator, _) => *operator,
            Self::Removed(operator, _) => *operator,
            Self::Despawned(operator) => *operator,
        }
    }

    /// Always present for inserts and removes, never for despawns.
    pub fn component(&self) -> Option<&ComponentKind> {
        match self {
            Self::Inserted(_, kind) | Self::Removed(_, kind) => Some(kind),
            Self::Despawned(_) => None,
        }
    }

    pub fn log(&self) -> String {
        match self.component() {
            Some(kind) => format!("{:?} {} {}", self.change_type(), self.operator(), kind),
            None => format!("{:?} {}", self.change_type(), self.operator()),
        }
    }
}

impl fmt::Display for EcsChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.log())
    }
}
