use crate::{
    entity::{Category, Entity},
    types::EntityId,
};

/// Per-category index of the entity population.
///
/// For each [`Category`], this stores the ids of the entities that held
/// that category when [`CategoryPartition::rebuild`] last ran, in entity
/// order. It is derived data: the store rebuilds it at the start of every
/// tick and nothing else writes to it.
///
/// Internally, `buckets[c.index()]` holds the members of category `c`.
#[derive(Debug, Clone, Default)]
pub struct CategoryPartition {
    buckets: [Vec<EntityId>; Category::COUNT],
}

impl CategoryPartition {
    /// Creates an empty partition with room for `per_bucket` ids in every bucket.
    pub fn with_capacity(per_bucket: usize) -> Self {
        Self {
            buckets: std::array::from_fn(|_| Vec::with_capacity(per_bucket)),
        }
    }

    /// Builds a partition over `entities` from scratch.
    pub fn build(entities: &[Entity]) -> Self {
        let mut partition = Self::default();
        partition.rebuild(entities);
        partition
    }

    /// Clears every bucket and refills them from `entities`.
    ///
    /// After this call each entity id appears in exactly one bucket: the
    /// one matching its current category. Bucket storage is reused.
    pub fn rebuild(&mut self, entities: &[Entity]) {
        self.clear();
        for (id, e) in entities.iter().enumerate() {
            self.buckets[e.category().index()].push(id);
        }
    }

    /// Empties every bucket, keeping their allocations.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Ids of the entities in `category`.
    #[inline]
    pub fn bucket(&self, category: Category) -> &[EntityId] {
        &self.buckets[category.index()]
    }

    /// Iterates over every category and its members, in [`Category::ALL`] order.
    ///
    /// Empty buckets are yielded too.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[EntityId])> + '_ {
        Category::ALL
            .into_iter()
            .map(move |c| (c, self.buckets[c.index()].as_slice()))
    }

    /// Sum of all bucket sizes.
    pub fn total_len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn sample() -> Vec<Entity> {
        vec![
            Entity::at(Vec3::ZERO, Category::Cube),
            Entity::at(Vec3::X, Category::Teapot),
            Entity::at(Vec3::Y, Category::Cube),
            Entity::at(Vec3::Z, Category::Troll),
        ]
    }

    #[test]
    fn with_capacity_starts_empty() {
        let p = CategoryPartition::with_capacity(8);
        assert!(p.is_empty());
        assert_eq!(p.total_len(), 0);
        for c in Category::ALL {
            assert!(p.bucket(c).is_empty());
        }
    }

    #[test]
    fn rebuild_assigns_every_entity_to_its_category() {
        let entities = sample();
        let p = CategoryPartition::build(&entities);

        assert_eq!(p.bucket(Category::Teapot), &[1]);
        assert_eq!(p.bucket(Category::Cube), &[0, 2]);
        assert!(p.bucket(Category::Sphere).is_empty());
        assert_eq!(p.bucket(Category::Troll), &[3]);
        assert_eq!(p.total_len(), entities.len());
    }

    #[test]
    fn rebuild_discards_previous_contents() {
        let mut entities = sample();
        let mut p = CategoryPartition::build(&entities);

        entities.truncate(1);
        p.rebuild(&entities);

        assert_eq!(p.total_len(), 1);
        assert_eq!(p.bucket(Category::Cube), &[0]);
        assert!(p.bucket(Category::Teapot).is_empty());
        assert!(p.bucket(Category::Troll).is_empty());
    }

    #[test]
    fn partition_is_a_disjoint_cover() {
        let entities = sample();
        let p = CategoryPartition::build(&entities);

        let mut seen = vec![0u32; entities.len()];
        for (category, ids) in p.iter() {
            for &id in ids {
                seen[id] += 1;
                assert_eq!(entities[id].category(), category);
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn iter_yields_all_categories_in_order() {
        let p = CategoryPartition::build(&sample());
        let order: Vec<Category> = p.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }

    #[test]
    fn clear_keeps_nothing() {
        let mut p = CategoryPartition::build(&sample());
        p.clear();
        assert!(p.is_empty());
    }
}
