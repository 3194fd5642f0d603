use std::{collections::BTreeMap, time::Duration};

use bevy_ecs::{component::Component, entity::Entity, world::World};

use opsync_shared::{reduce, ComponentKind, HandlerError, OperatorId, WorldMutType, WorldRefType};

use crate::components::{Apply, Op, OpComponents, Random, Sample};

// BevyWorld - one Bevy entity per operator
pub struct BevyWorld {
    world: World,
    entities: BTreeMap<OperatorId, Entity>,
}

impl Default for BevyWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl BevyWorld {
    pub fn new() -> Self {
        Self::from_world(World::new())
    }

    pub fn from_world(world: World) -> Self {
        Self {
            world,
            entities: BTreeMap::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn entity(&self, operator: &OperatorId) -> Option<Entity> {
        self.entities.get(operator).copied()
    }

    pub fn component<C: Component>(&self, operator: &OperatorId) -> Option<&C> {
        let entity = self.entity(operator)?;
        self.world.get::<C>(entity)
    }

    /// Inserts a typed component on the operator's entity.
    pub fn insert_component<C: Component>(
        &mut self,
        operator: &OperatorId,
        component: C,
    ) -> Result<(), HandlerError> {
        let entity = self.entity(operator).ok_or(HandlerError::StaleOperator)?;
        let Ok(mut entity_mut) = self.world.get_entity_mut(entity) else {
            return Err(HandlerError::StaleOperator);
        };
        entity_mut.insert(component);
        Ok(())
    }

    /// Takes a typed component off the operator's entity.
    pub fn remove_component<C: Component>(&mut self, operator: &OperatorId) -> Option<C> {
        let entity = self.entity(operator)?;
        let mut entity_mut = self.world.get_entity_mut(entity).ok()?;
        entity_mut.take::<C>()
    }

    // Built-in kinds //

    /// Advances every `Sample` timer and returns the operators due for
    /// sampling, in operator order.
    pub fn due_samplers(&mut self, delta: Duration) -> Vec<OperatorId> {
        let mut query = self.world.query::<(&Op, &mut Sample)>();
        let mut due: Vec<OperatorId> = query
            .iter_mut(&mut self.world)
            .filter_map(|(op, mut sample)| sample.0.tick(delta).then_some(op.id))
            .collect();
        due.sort();
        due
    }

    /// Hands parameter values read from the host to the operator's sampler.
    /// Returns false if the operator has no `Sample` component.
    pub fn record_sample<'a>(
        &mut self,
        operator: &OperatorId,
        parameters: impl IntoIterator<Item = (&'a str, f32)>,
    ) -> bool {
        let Some(entity) = self.entity(operator) else {
            return false;
        };
        let Some(mut sample) = self.world.get_mut::<Sample>(entity) else {
            return false;
        };
        sample.0.record(parameters);
        true
    }

    /// Values each `Apply` operator should write back to the host, reduced
    /// over everything the samplers currently hold.
    pub fn apply_targets(&mut self) -> Vec<(OperatorId, BTreeMap<String, f32>)> {
        let mut samples = self.world.query::<&Sample>();
        let values: Vec<(String, f32)> = samples
            .iter(&self.world)
            .flat_map(|sample| sample.0.values().iter())
            .map(|(name, value)| (name.clone(), *value))
            .collect();

        let mut appliers = self.world.query::<(&Op, &Apply)>();
        let mut targets: Vec<(OperatorId, BTreeMap<String, f32>)> = appliers
            .iter(&self.world)
            .map(|(op, apply)| {
                let values = values.iter().map(|(name, value)| (name.as_str(), *value));
                (op.id, reduce(values, &apply.filter, apply.strat))
            })
            .collect();
        targets.sort_by_key(|(operator, _)| *operator);
        targets
    }

    /// Operators marked for randomization, with the parameter and range to use.
    pub fn random_targets(&mut self) -> Vec<(OperatorId, Random)> {
        let mut query = self.world.query::<(&Op, &Random)>();
        let mut targets: Vec<(OperatorId, Random)> = query
            .iter(&self.world)
            .map(|(op, random)| (op.id, random.clone()))
            .collect();
        targets.sort_by_key(|(operator, _)| *operator);
        targets
    }
}

impl WorldRefType for BevyWorld {
    fn has_entity(&self, operator: &OperatorId) -> bool {
        self.entities.contains_key(operator)
    }

    fn entities(&self) -> Vec<OperatorId> {
        self.entities.keys().copied().collect()
    }

    fn has_component_of_kind(&self, operator: &OperatorId, kind: &ComponentKind) -> bool {
        self.component::<OpComponents>(operator)
            .is_some_and(|components| components.contains(kind))
    }

    fn component_kinds(&self, operator: &OperatorId) -> Vec<ComponentKind> {
        self.component::<OpComponents>(operator)
            .map(|components| components.kinds().cloned().collect())
            .unwrap_or_default()
    }
}

impl WorldMutType for BevyWorld {
    fn spawn_entity(&mut self, operator: &OperatorId) {
        if self.entities.contains_key(operator) {
            return;
        }
        let entity = self
            .world
            .spawn((Op { id: *operator }, OpComponents::default()))
            .id();
        self.entities.insert(*operator, entity);
    }

    fn despawn_entity(&mut self, operator: &OperatorId) {
        if let Some(entity) = self.entities.remove(operator) {
            self.world.despawn(entity);
        }
    }

    fn insert_component_kind(&mut self, operator: &OperatorId, kind: &ComponentKind) {
        self.spawn_entity(operator);
        let Some(entity) = self.entity(operator) else {
            return;
        };
        if let Some(mut components) = self.world.get_mut::<OpComponents>(entity) {
            components.insert(kind.clone());
        }
    }

    fn remove_component_kind(&mut self, operator: &OperatorId, kind: &ComponentKind) -> bool {
        let Some(entity) = self.entity(operator) else {
            return false;
        };
        self.world
            .get_mut::<OpComponents>(entity)
            .is_some_and(|mut components| components.remove(kind))
    }
}
