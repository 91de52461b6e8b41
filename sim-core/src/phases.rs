//! The phases of one clustering tick.
//!
//! A tick runs, in this order:
//! 1. [`EntityStore::rebuild_partition`]: group entity ids by category.
//! 2. [`attraction_phase`]: per category, compute the centroid of all
//!    current members, then point every member at it and move it one
//!    fixed step along that direction.
//! 3. [`prune_phase`]: remove every entity whose measured distance to its
//!    centroid is below the prune threshold.
//!
//! [`crate::simulator::ClusterSimulator::step`] wires them together.

use glam::Vec3;
use rand::Rng;

use crate::{
    config::Config,
    entity::Entity,
    geometry::{attraction, centroid},
    store::EntityStore,
};

/// Pulls every entity one step towards its category centroid.
///
/// For each non-empty bucket of the partition:
///
/// 1. Computes the centroid over the bucket's full membership, before any
///    member has moved.
/// 2. For each member, sets `direction` to the unit vector towards the
///    centroid (or zero when within `cfg.normalize_epsilon`) and
///    `distance` to the distance from the pre-move position.
/// 3. Advances `position` by `direction * cfg.step_size`.
///
/// Empty buckets are skipped. The partition must have been rebuilt since
/// the last population change.
///
/// ### Parameters
/// - `store` - The population; positions, directions and distances are
///   updated in place, read through its current partition.
/// - `cfg` - Global configuration, providing the step size and the
///   epsilon below which a direction is clamped to zero.
///
/// ### Returns
/// The number of entities that actually moved.
pub fn attraction_phase<R: Rng>(store: &mut EntityStore<R>, cfg: &Config) -> usize {
    let (entities, partition) = store.split_mut();
    let mut moved = 0;

    for (_category, ids) in partition.iter() {
        let Some(center) = centroid(ids.iter().map(|&id| entities[id].position)) else {
            continue;
        };

        for &id in ids {
            let e = &mut entities[id];
            let (dir, distance) = attraction(e.position, center, cfg.normalize_epsilon);
            e.direction = dir;
            e.distance = distance;
            if dir != Vec3::ZERO {
                e.position += dir * cfg.step_size;
                moved += 1;
            }
        }
    }
    moved
}

/// Removes entities that have converged onto their centroid.
///
/// An entity is removed when its `distance` is strictly less than
/// `cfg.prune_threshold`; an entity exactly at the threshold survives.
/// This must run after [`attraction_phase`] so that every distance is
/// from the current tick.
///
/// ### Parameters
/// - `store` - The population to prune; its partition is left stale.
/// - `cfg` - Global configuration, providing the prune threshold.
///
/// ### Returns
/// The removed entities, in their previous relative order.
pub fn prune_phase<R: Rng>(store: &mut EntityStore<R>, cfg: &Config) -> Vec<Entity> {
    let threshold = cfg.prune_threshold;
    store.remove_where(|e| e.distance < threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Category;

    fn store_with(points: &[(f32, f32, f32, Category)]) -> EntityStore {
        let mut store = EntityStore::seeded(0, 1.0);
        for &(x, y, z, c) in points {
            store.insert(Entity::at(Vec3::new(x, y, z), c));
        }
        store.rebuild_partition();
        store
    }

    #[test]
    fn attraction_phase_moves_towards_category_centroid() {
        let mut store = store_with(&[
            (0.0, 0.0, 0.0, Category::Teapot),
            (10.0, 0.0, 0.0, Category::Teapot),
            (5.0, 0.0, 0.0, Category::Teapot),
        ]);
        let cfg = Config::default();

        let moved = attraction_phase(&mut store, &cfg);

        assert_eq!(moved, 2);
        let e = store.entities();
        assert!((e[0].position - Vec3::new(0.1, 0.0, 0.0)).length() < 1e-6);
        assert!((e[1].position - Vec3::new(9.9, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(e[2].position, Vec3::new(5.0, 0.0, 0.0));

        assert_eq!(e[0].direction, Vec3::X);
        assert_eq!(e[1].direction, -Vec3::X);
        assert_eq!(e[2].direction, Vec3::ZERO);
        assert!((e[0].distance - 5.0).abs() < 1e-6);
        assert!((e[1].distance - 5.0).abs() < 1e-6);
        assert_eq!(e[2].distance, 0.0);
    }

    #[test]
    fn categories_attract_independently() {
        let mut store = store_with(&[
            (0.0, 0.0, 0.0, Category::Cube),
            (2.0, 0.0, 0.0, Category::Cube),
            (0.0, 0.0, 0.0, Category::Troll),
            (0.0, 0.0, 4.0, Category::Troll),
        ]);
        attraction_phase(&mut store, &Config::default());

        let e = store.entities();
        assert_eq!(e[0].direction, Vec3::X);
        assert_eq!(e[1].direction, -Vec3::X);
        assert_eq!(e[2].direction, Vec3::Z);
        assert_eq!(e[3].direction, -Vec3::Z);
        assert!((e[0].distance - 1.0).abs() < 1e-6);
        assert!((e[2].distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn single_member_bucket_is_its_own_centroid() {
        let mut store = store_with(&[(3.0, 1.0, -2.0, Category::Sphere)]);
        let moved = attraction_phase(&mut store, &Config::default());

        let e = &store.entities()[0];
        assert_eq!(moved, 0);
        assert_eq!(e.position, Vec3::new(3.0, 1.0, -2.0));
        assert_eq!(e.direction, Vec3::ZERO);
        assert_eq!(e.distance, 0.0);
    }

    #[test]
    fn step_displacement_reduces_distance_by_step_size() {
        let mut store = store_with(&[
            (1.0, 2.0, 3.0, Category::Cube),
            (-3.0, 0.0, 5.0, Category::Cube),
            (4.0, -1.0, 0.0, Category::Cube),
        ]);
        let center = Vec3::new(2.0 / 3.0, 1.0 / 3.0, 8.0 / 3.0);
        let before: Vec<f32> = store
            .entities()
            .iter()
            .map(|e| e.position.distance(center))
            .collect();
        let cfg = Config::default();

        attraction_phase(&mut store, &cfg);

        for (e, d0) in store.entities().iter().zip(before) {
            assert!(d0 > cfg.step_size);
            let d1 = e.position.distance(center);
            assert!((d0 - d1 - cfg.step_size).abs() < 1e-5, "d0={d0} d1={d1}");
            // Still on the same side of the centroid.
            assert!((center - e.position).dot(e.direction) > 0.0);
        }
    }

    #[test]
    fn attraction_phase_on_empty_store_is_a_no_op() {
        let mut store = store_with(&[]);
        assert_eq!(attraction_phase(&mut store, &Config::default()), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn prune_phase_uses_strict_threshold() {
        let mut store = store_with(&[
            (0.0, 0.0, 0.0, Category::Teapot),
            (1.0, 0.0, 0.0, Category::Teapot),
            (2.0, 0.0, 0.0, Category::Teapot),
        ]);
        let cfg = Config::default();
        {
            let e = store.entities_mut();
            e[0].distance = cfg.prune_threshold * 0.5;
            e[1].distance = cfg.prune_threshold;
            e[2].distance = 3.0;
        }

        let pruned = prune_phase(&mut store, &cfg);

        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].position, Vec3::ZERO);
        assert_eq!(store.len(), 2);
        assert_eq!(store.entities()[0].distance, cfg.prune_threshold);
    }
}
