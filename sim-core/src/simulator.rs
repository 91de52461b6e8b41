use rand::{Rng, rngs::StdRng};
use tracing::{debug, trace};

use crate::{
    config::Config,
    entity::{Category, Entity},
    error::ConfigError,
    phases,
    store::EntityStore,
    types::EntityId,
};

/// What a single [`ClusterSimulator::step`] did.
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Tick number this report belongs to, starting at 1.
    pub tick: u64,
    /// Entities that moved towards their centroid.
    pub moved: usize,
    /// Entities removed at the end of the tick.
    pub pruned: Vec<Entity>,
    /// Population after pruning.
    pub population: usize,
    /// Advisory redraw request for the renderer.
    pub scene_changed: bool,
}

/// Drives the entity population one tick at a time.
///
/// Owns the [`EntityStore`] and the [`Config`]. Hosts call
/// [`ClusterSimulator::step`] from their tick source and route commands
/// to [`ClusterSimulator::add_entity`] / [`ClusterSimulator::repopulate`]
/// between steps.
#[derive(Debug)]
pub struct ClusterSimulator<R = StdRng> {
    store: EntityStore<R>,
    cfg: Config,
    tick: u64,
}

impl ClusterSimulator<StdRng> {
    /// Convenience constructor with a seeded [`StdRng`] and an empty store.
    pub fn seeded(seed: u64, cfg: Config) -> Result<Self, ConfigError> {
        Self::new(EntityStore::seeded(seed, cfg.spawn_half_extent), cfg)
    }
}

impl<R: Rng> ClusterSimulator<R> {
    pub fn new(mut store: EntityStore<R>, cfg: Config) -> Result<Self, ConfigError> {
        cfg.validate()?;
        store.set_spawn_half_extent(cfg.spawn_half_extent);
        Ok(Self {
            store,
            cfg,
            tick: 0,
        })
    }

    /// Advances the simulation by a single tick.
    ///
    /// 1. Rebuilds the category partition.
    /// 2. [`phases::attraction_phase`]: centroids, directions, distances, moves.
    /// 3. [`phases::prune_phase`]: removes converged entities.
    ///
    /// Centroids always include the full pre-prune membership of the tick.
    pub fn step(&mut self) -> StepReport {
        self.tick += 1;

        self.store.rebuild_partition();
        let moved = phases::attraction_phase(&mut self.store, &self.cfg);
        let pruned = phases::prune_phase(&mut self.store, &self.cfg);

        if !pruned.is_empty() {
            debug!(
                tick = self.tick,
                pruned = pruned.len(),
                "pruned converged entities"
            );
        }
        trace!(
            tick = self.tick,
            moved,
            population = self.store.len(),
            "step"
        );

        StepReport {
            tick: self.tick,
            moved,
            pruned,
            population: self.store.len(),
            scene_changed: true,
        }
    }

    pub fn add_entity(&mut self, category: Category) -> EntityId {
        self.store.add_entity(category)
    }

    pub fn repopulate(&mut self, count: usize) {
        self.store.repopulate(count);
    }

    /// Repopulates with [`Config::initial_population`] entities.
    pub fn reset(&mut self) {
        self.store.repopulate(self.cfg.initial_population);
        self.tick = 0;
    }

    #[inline]
    pub fn store(&self) -> &EntityStore<R> {
        &self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut EntityStore<R> {
        &mut self.store
    }

    #[inline]
    pub fn entities(&self) -> &[Entity] {
        self.store.entities()
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Replaces the configuration if it validates; the old one is kept otherwise.
    pub fn set_config(&mut self, cfg: Config) -> Result<(), ConfigError> {
        cfg.validate()?;
        self.store.set_spawn_half_extent(cfg.spawn_half_extent);
        self.cfg = cfg;
        Ok(())
    }

    /// Number of ticks since construction or the last [`ClusterSimulator::reset`].
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }
}
