use bevy_ecs::component::Component;

use log::info;

use opsync_shared::{
    BuiltinConfig, ComponentHandler, ComponentKind, HandlerError, HandlerRegistry, OperatorId,
    Sampler, SyncError,
};

use crate::{
    components::{Apply, Random, Sample},
    BevyWorld,
};

/// Inserts a freshly built `C` on the operator's entity when its kind is
/// attached, and takes it off again when the kind is removed.
pub struct ComponentInserter<C: Component> {
    kind: ComponentKind,
    build: Box<dyn Fn() -> C>,
}

impl<C: Component> ComponentInserter<C> {
    pub fn new(kind: ComponentKind, build: impl Fn() -> C + 'static) -> Self {
        Self {
            kind,
            build: Box::new(build),
        }
    }
}

impl<C: Component> ComponentHandler<BevyWorld> for ComponentInserter<C> {
    fn on_insert(
        &mut self,
        world: &mut BevyWorld,
        operator: &OperatorId,
    ) -> Result<(), HandlerError> {
        world.insert_component(operator, (self.build)())
    }

    fn on_remove(
        &mut self,
        world: &mut BevyWorld,
        operator: &OperatorId,
    ) -> Result<(), HandlerError> {
        match world.remove_component::<C>(operator) {
            Some(_) => Ok(()),
            None => Err(HandlerError::MissingState {
                operator: *operator,
                kind: self.kind.clone(),
            }),
        }
    }
}

/// Registers handlers for the `random`, `sample` and `apply` kinds that keep
/// their state in typed Bevy components.
pub fn register_bevy_handlers(
    registry: &mut HandlerRegistry<BevyWorld>,
    config: &BuiltinConfig,
) -> Result<(), SyncError> {
    let random = config.random.clone();
    registry.register(
        ComponentKind::RANDOM,
        ComponentInserter::new(ComponentKind::RANDOM, move || Random {
            parameter: random.parameter.clone(),
            range: random.range.clone(),
        }),
    )?;

    let sample = config.sample.clone();
    registry.register(
        ComponentKind::SAMPLE,
        ComponentInserter::new(ComponentKind::SAMPLE, move || {
            Sample(Sampler::new(sample.interval, sample.filter.clone()))
        }),
    )?;

    let apply = config.apply.clone();
    registry.register(
        ComponentKind::APPLY,
        ComponentInserter::new(ComponentKind::APPLY, move || Apply {
            filter: apply.filter.clone(),
            strat: apply.strat,
        }),
    )?;

    info!("Bevy handlers registered for {} kinds", registry.kinds().len());
    Ok(())
}
