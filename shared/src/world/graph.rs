use crate::{ComponentId, ComponentKind, OperatorId};

/// Read access to the external operator graph.
///
/// The graph is owned and mutated by the host between ticks. Within a tick it
/// is read as if it were a consistent view, except that operators may vanish
/// between the scan and the apply phase.
pub trait OperatorGraph {
    /// Every component id currently instantiated anywhere in the graph.
    fn list_components(&self) -> Vec<ComponentId>;

    /// Operators currently attached to `component`.
    fn operators_referencing(&self, component: &ComponentId) -> Vec<OperatorId>;

    /// The declared kind of `component`, or `None` if it cannot be read.
    fn kind_of(&self, component: &ComponentId) -> Option<ComponentKind>;

    /// Liveness check used for despawn detection.
    fn exists(&self, operator: &OperatorId) -> bool;
}

impl<G: OperatorGraph + ?Sized> OperatorGraph for &G {
    fn list_components(&self) -> Vec<ComponentId> {
        (**self).list_components()
    }

    fn operators_referencing(&self, component: &ComponentId) -> Vec<OperatorId> {
        (**self).operators_referencing(component)
    }

    fn kind_of(&self, component: &ComponentId) -> Option<ComponentKind> {
        (**self).kind_of(component)
    }

    fn exists(&self, operator: &OperatorId) -> bool {
        (**self).exists(operator)
    }
}
