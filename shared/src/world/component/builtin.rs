//! The component kinds shipped with opsync: `random`, `sample` and `apply`.
//!
//! The handlers here keep the per-operator state for each kind. Reading and
//! writing host parameters is left to the host, which drives these handlers
//! between ticks.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    ops::Range,
    time::Duration,
};

use crate::{
    ComponentHandler, ComponentKind, HandlerError, HandlerRegistry, OperatorId, SyncError,
    WorldMutType,
};

// Config //

/// Settings for the `random` kind
#[derive(Clone, Debug, PartialEq)]
pub struct RandomConfig {
    /// Name of the host parameter that receives random values
    pub parameter: String,
    /// Range random values are drawn from
    pub range: Range<f32>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            parameter: "gain".to_string(),
            range: 0.0..2.0,
        }
    }
}

/// Settings for the `sample` kind
#[derive(Clone, Debug, PartialEq)]
pub struct SampleConfig {
    /// How often each sampler fires
    pub interval: Duration,
    /// Only parameters whose name contains this string are sampled
    pub filter: String,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            filter: String::new(),
        }
    }
}

/// How an applier folds the values of several samplers into one
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strat {
    #[default]
    Mean,
    Max,
}

/// Settings for the `apply` kind
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyConfig {
    /// Only sampled values whose name contains this string are applied
    pub filter: String,
    pub strat: Strat,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuiltinConfig {
    pub random: RandomConfig,
    pub sample: SampleConfig,
    pub apply: ApplyConfig,
}

/// Registers the `random`, `sample` and `apply` handlers.
pub fn register_builtins<W: WorldMutType>(
    registry: &mut HandlerRegistry<W>,
    config: &BuiltinConfig,
) -> Result<(), SyncError> {
    registry.register(ComponentKind::RANDOM, RandomHandler::new(config.random.clone()))?;
    registry.register(ComponentKind::SAMPLE, SampleHandler::new(config.sample.clone()))?;
    registry.register(ComponentKind::APPLY, ApplyHandler::new(config.apply.clone()))?;
    Ok(())
}

// Random //

pub struct RandomHandler {
    config: RandomConfig,
    operators: BTreeSet<OperatorId>,
    rng: fastrand::Rng,
}

impl RandomHandler {
    pub fn new(config: RandomConfig) -> Self {
        Self {
            config,
            operators: BTreeSet::new(),
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(config: RandomConfig, seed: u64) -> Self {
        Self {
            config,
            operators: BTreeSet::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn config(&self) -> &RandomConfig {
        &self.config
    }

    pub fn operators(&self) -> impl Iterator<Item = &OperatorId> {
        self.operators.iter()
    }

    pub fn contains(&self, operator: &OperatorId) -> bool {
        self.operators.contains(operator)
    }

    /// Draws one value per operator for the configured parameter.
    pub fn roll(&mut self) -> Vec<(OperatorId, f32)> {
        let (start, end) = (self.config.range.start, self.config.range.end);
        let rng = &self.rng;
        self.operators
            .iter()
            .map(|operator| (*operator, start + rng.f32() * (end - start)))
            .collect()
    }
}

impl<W: WorldMutType> ComponentHandler<W> for RandomHandler {
    fn on_insert(&mut self, _world: &mut W, operator: &OperatorId) -> Result<(), HandlerError> {
        self.operators.insert(*operator);
        Ok(())
    }

    fn on_remove(&mut self, _world: &mut W, operator: &OperatorId) -> Result<(), HandlerError> {
        if !self.operators.remove(operator) {
            return Err(HandlerError::MissingState {
                operator: *operator,
                kind: ComponentKind::RANDOM,
            });
        }
        Ok(())
    }
}

// Sample //

/// Repeating timer plus the parameter values it last captured.
#[derive(Clone, Debug, PartialEq)]
pub struct Sampler {
    interval: Duration,
    filter: String,
    elapsed: Duration,
    values: HashMap<String, f32>,
}

impl Sampler {
    pub fn new(interval: Duration, filter: String) -> Self {
        Self {
            interval,
            filter,
            elapsed: Duration::ZERO,
            values: HashMap::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn values(&self) -> &HashMap<String, f32> {
        &self.values
    }

    /// Advances the timer, returning true if at least one interval elapsed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.interval.is_zero() {
            return true;
        }
        self.elapsed = self.elapsed.saturating_add(delta);
        if self.elapsed < self.interval {
            return false;
        }
        // any number of skipped intervals collapse into one firing
        let left = self.elapsed.as_nanos() % self.interval.as_nanos();
        self.elapsed = Duration::new(
            (left / 1_000_000_000) as u64,
            (left % 1_000_000_000) as u32,
        );
        true
    }

    /// Keeps the parameters whose name passes the filter.
    pub fn record<'a>(&mut self, parameters: impl IntoIterator<Item = (&'a str, f32)>) {
        self.values.extend(
            parameters
                .into_iter()
                .filter(|(name, _)| name.contains(self.filter.as_str()))
                .map(|(name, value)| (name.to_string(), value)),
        );
    }
}

pub struct SampleHandler {
    config: SampleConfig,
    samplers: BTreeMap<OperatorId, Sampler>,
}

impl SampleHandler {
    pub fn new(config: SampleConfig) -> Self {
        Self {
            config,
            samplers: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    pub fn sampler(&self, operator: &OperatorId) -> Option<&Sampler> {
        self.samplers.get(operator)
    }

    pub fn sampler_mut(&mut self, operator: &OperatorId) -> Option<&mut Sampler> {
        self.samplers.get_mut(operator)
    }

    pub fn samplers(&self) -> impl Iterator<Item = (&OperatorId, &Sampler)> {
        self.samplers.iter()
    }

    /// Advances every sampler and returns the operators due for sampling.
    pub fn due(&mut self, delta: Duration) -> Vec<OperatorId> {
        self.samplers
            .iter_mut()
            .filter_map(|(operator, sampler)| sampler.tick(delta).then_some(*operator))
            .collect()
    }
}

impl<W: WorldMutType> ComponentHandler<W> for SampleHandler {
    fn on_insert(&mut self, _world: &mut W, operator: &OperatorId) -> Result<(), HandlerError> {
        let sampler = Sampler::new(self.config.interval, self.config.filter.clone());
        self.samplers.insert(*operator, sampler);
        Ok(())
    }

    fn on_remove(&mut self, _world: &mut W, operator: &OperatorId) -> Result<(), HandlerError> {
        match self.samplers.remove(operator) {
            Some(_) => Ok(()),
            None => Err(HandlerError::MissingState {
                operator: *operator,
                kind: ComponentKind::SAMPLE,
            }),
        }
    }
}

// Apply //

pub struct ApplyHandler {
    config: ApplyConfig,
    appliers: BTreeSet<OperatorId>,
}

impl ApplyHandler {
    pub fn new(config: ApplyConfig) -> Self {
        Self {
            config,
            appliers: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &ApplyConfig {
        &self.config
    }

    pub fn contains(&self, operator: &OperatorId) -> bool {
        self.appliers.contains(operator)
    }

    /// Combines everything the samplers hold into the values each applier
    /// should write back to its operator.
    pub fn collect(&self, samples: &SampleHandler) -> Vec<(OperatorId, BTreeMap<String, f32>)> {
        self.appliers
            .iter()
            .map(|operator| {
                let values = samples
                    .samplers()
                    .flat_map(|(_, sampler)| sampler.values().iter())
                    .map(|(name, value)| (name.as_str(), *value));
                (*operator, reduce(values, &self.config.filter, self.config.strat))
            })
            .collect()
    }
}

impl<W: WorldMutType> ComponentHandler<W> for ApplyHandler {
    fn on_insert(&mut self, _world: &mut W, operator: &OperatorId) -> Result<(), HandlerError> {
        self.appliers.insert(*operator);
        Ok(())
    }

    fn on_remove(&mut self, _world: &mut W, operator: &OperatorId) -> Result<(), HandlerError> {
        if !self.appliers.remove(operator) {
            return Err(HandlerError::MissingState {
                operator: *operator,
                kind: ComponentKind::APPLY,
            });
        }
        Ok(())
    }
}

/// Groups values by parameter name, keeping names that contain `filter`, and
/// folds each group with `strat`.
pub fn reduce<'a>(
    values: impl IntoIterator<Item = (&'a str, f32)>,
    filter: &str,
    strat: Strat,
) -> BTreeMap<String, f32> {
    let mut grouped: BTreeMap<String, Vec<f32>> = BTreeMap::new();
    for (name, value) in values {
        if name.contains(filter) {
            grouped.entry(name.to_string()).or_default().push(value);
        }
    }

    grouped
        .into_iter()
        .filter_map(|(name, group)| {
            let folded = match strat {
                Strat::Max => group
                    .iter()
                    .copied()
                    .reduce(|max, value| if value > max { value } else { max })?,
                Strat::Mean => group.iter().sum::<f32>() / group.len() as f32,
            };
            Some((name, folded))
        })
        .collect()
}
