use thiserror::Error;

use crate::{ComponentKind, OperatorId};

/// Errors raised while applying changes to the World or building its handler
/// registry.
///
/// `UnknownKind` and `Handler` are isolated to the one change that raised
/// them. `DuplicateInsert` means the differ's bookkeeping no longer matches the
/// World, so the tick that hits it is abandoned and not committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A change names a component kind with no registered handler
    #[error("No handler registered for component kind '{kind}' (needed by {operator})")]
    UnknownKind {
        operator: OperatorId,
        kind: ComponentKind,
    },

    /// Insert of a component kind the operator already holds
    #[error("Component kind '{kind}' already present on {operator} without an intervening remove")]
    DuplicateInsert {
        operator: OperatorId,
        kind: ComponentKind,
    },

    /// Two handlers registered for one kind
    #[error("Component kind '{kind}' already has a registered handler")]
    KindAlreadyRegistered { kind: ComponentKind },

    /// A kind handler failed for a reason other than a vanished operator
    #[error("Handler for component kind '{kind}' failed on {operator}: {source}")]
    Handler {
        operator: OperatorId,
        kind: ComponentKind,
        #[source]
        source: HandlerError,
    },
}

impl SyncError {
    /// Structural errors abort the tick and skip the commit of differ state.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::DuplicateInsert { .. })
    }
}

/// Errors a component kind handler may report back to the World
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The operator disappeared between the scan and the apply phase. The World
    /// treats this as if its despawn had already been processed.
    #[error("Operator no longer exists")]
    StaleOperator,

    /// Per-operator state the handler expected to find was missing
    #[error("No '{kind}' state found for {operator}")]
    MissingState {
        operator: OperatorId,
        kind: ComponentKind,
    },

    #[error("{reason}")]
    Failed { reason: String },
}
