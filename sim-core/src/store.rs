use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::{
    config::MAX_SPAWN_HALF_EXTENT,
    entity::{Category, Entity},
    partition::CategoryPartition,
    types::EntityId,
};

/// The entity population and its per-category index.
///
/// The random source is injected so that spawning is reproducible under a
/// seeded generator.
#[derive(Debug)]
pub struct EntityStore<R = StdRng> {
    entities: Vec<Entity>,
    partition: CategoryPartition,
    rng: R,
    spawn_half_extent: f32,
}

impl EntityStore<StdRng> {
    /// Creates an empty store backed by a [`StdRng`] seeded with `seed`.
    pub fn seeded(seed: u64, spawn_half_extent: f32) -> Self {
        Self::new(StdRng::seed_from_u64(seed), spawn_half_extent)
    }
}

impl<R: Rng> EntityStore<R> {
    pub fn new(rng: R, spawn_half_extent: f32) -> Self {
        Self {
            entities: Vec::new(),
            partition: CategoryPartition::default(),
            rng,
            spawn_half_extent: clamp_extent(spawn_half_extent),
        }
    }

    /// Replaces the whole population with `count` freshly spawned entities.
    ///
    /// Categories are drawn uniformly from [`Category::ALL`].
    pub fn repopulate(&mut self, count: usize) {
        self.entities.clear();
        self.entities.reserve(count);
        self.partition = CategoryPartition::with_capacity(count.div_ceil(Category::COUNT));
        for _ in 0..count {
            let category = Category::random(&mut self.rng);
            let e = Entity::random(category, self.spawn_half_extent, &mut self.rng);
            self.entities.push(e);
        }
        info!(count, "repopulated entity store");
    }

    /// Appends one freshly spawned entity of `category` and returns its id.
    pub fn add_entity(&mut self, category: Category) -> EntityId {
        let id = self.entities.len();
        let e = Entity::random(category, self.spawn_half_extent, &mut self.rng);
        self.entities.push(e);
        debug!(id, %category, "added entity");
        id
    }

    /// Pushes an already constructed entity. Mostly useful for scripted scenes.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.len();
        self.entities.push(entity);
        id
    }

    /// Rebuilds the category partition from the current population.
    pub fn rebuild_partition(&mut self) {
        self.partition.rebuild(&self.entities);
    }

    /// Removes every entity matching `predicate` in a single pass.
    ///
    /// Survivors keep their relative order. The removed entities are
    /// returned in their original relative order as well. The partition is
    /// left stale and must be rebuilt before it is read again.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Entity) -> bool) -> Vec<Entity> {
        let all = std::mem::take(&mut self.entities);
        let mut kept = Vec::with_capacity(all.len());
        let mut removed = Vec::new();
        for e in all {
            if predicate(&e) {
                removed.push(e);
            } else {
                kept.push(e);
            }
        }
        self.entities = kept;
        if !removed.is_empty() {
            self.partition.clear();
            debug!(
                removed = removed.len(),
                remaining = self.entities.len(),
                "removed entities"
            );
        }
        removed
    }

    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Mutable access for hosts that edit entities in place between ticks.
    ///
    /// Categories cannot change through this; the slice cannot grow or shrink.
    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// The partition as of the last [`EntityStore::rebuild_partition`].
    #[inline]
    pub fn partition(&self) -> &CategoryPartition {
        &self.partition
    }

    /// Entities and partition together, for phases that read one while writing the other.
    pub(crate) fn split_mut(&mut self) -> (&mut [Entity], &CategoryPartition) {
        (&mut self.entities, &self.partition)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of live entities per category, in [`Category::ALL`] order.
    pub fn category_counts(&self) -> [usize; Category::COUNT] {
        let mut counts = [0; Category::COUNT];
        for e in &self.entities {
            counts[e.category().index()] += 1;
        }
        counts
    }

    pub fn spawn_half_extent(&self) -> f32 {
        self.spawn_half_extent
    }

    /// Sets the spawn half-extent, clamped into `[0, MAX_SPAWN_HALF_EXTENT]`.
    ///
    /// Negative values are taken by magnitude; NaN becomes zero.
    pub fn set_spawn_half_extent(&mut self, half_extent: f32) {
        self.spawn_half_extent = clamp_extent(half_extent);
    }
}

fn clamp_extent(half_extent: f32) -> f32 {
    if half_extent.is_nan() {
        0.0
    } else {
        half_extent.abs().min(MAX_SPAWN_HALF_EXTENT)
    }
}
