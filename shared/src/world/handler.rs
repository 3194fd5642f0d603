use std::{any::Any, collections::HashMap};

use log::info;

use crate::{ComponentKind, HandlerError, OperatorId, SyncError};

/// Lets a boxed handler be downcast back to its concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// What to do when a component kind is inserted on, or removed from, an
/// operator. `W` is the World storage the handler may write to.
pub trait ComponentHandler<W>: AsAny {
    fn on_insert(&mut self, world: &mut W, operator: &OperatorId) -> Result<(), HandlerError>;
    fn on_remove(&mut self, world: &mut W, operator: &OperatorId) -> Result<(), HandlerError>;
}

/// Component kind → handler table, built once at startup.
pub struct HandlerRegistry<W> {
    handlers: HashMap<ComponentKind, Box<dyn ComponentHandler<W>>>,
}

impl<W> Default for HandlerRegistry<W> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<W> HandlerRegistry<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H: ComponentHandler<W> + 'static>(
        &mut self,
        kind: ComponentKind,
        handler: H,
    ) -> Result<(), SyncError> {
        if self.handlers.contains_key(&kind) {
            return Err(SyncError::KindAlreadyRegistered { kind });
        }

        info!("HandlerRegistry: Registering handler for Component kind '{}'", kind);
        self.handlers.insert(kind, Box::new(handler));
        Ok(())
    }

    pub fn has_kind(&self, kind: &ComponentKind) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Registered kinds, sorted by name.
    pub fn kinds(&self) -> Vec<ComponentKind> {
        let mut kinds: Vec<ComponentKind> = self.handlers.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// The handler registered for `kind`, if it is an `H`.
    pub fn handler<H: 'static>(&self, kind: &ComponentKind) -> Option<&H> {
        self.handlers
            .get(kind)
            .and_then(|handler| (**handler).as_any().downcast_ref::<H>())
    }

    pub fn handler_mut<H: 'static>(&mut self, kind: &ComponentKind) -> Option<&mut H> {
        self.handlers
            .get_mut(kind)
            .and_then(|handler| (**handler).as_any_mut().downcast_mut::<H>())
    }

    pub(crate) fn dispatch(&mut self, kind: &ComponentKind) -> Option<&mut Box<dyn ComponentHandler<W>>> {
        self.handlers.get_mut(kind)
    }
}
