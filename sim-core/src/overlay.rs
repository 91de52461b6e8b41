//! Connectivity overlay: one line between every ordered pair of entities
//! that share a category.
//!
//! The line set is dense on purpose, `n * (n - 1)` lines for a category
//! with `n` members, so that every same-category pair is visibly linked.
//! Cost is quadratic in the size of the largest category.

use glam::{Vec3, Vec4};

use crate::{
    entity::{Category, Entity},
    partition::CategoryPartition,
};

/// One end of a connection line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineVertex {
    pub pos: Vec3,
    pub color: Vec4,
}

/// A line from entity `i` to entity `j` of the same category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionLine {
    pub category: Category,
    pub from: LineVertex,
    pub to: LineVertex,
}

/// Builds every ordered pair `(i, j)`, `i != j`, within each category.
///
/// Categories are visited in [`Category::ALL`] order and members in entity
/// order, so the output is deterministic for a given population.
pub fn connection_lines(entities: &[Entity]) -> Vec<ConnectionLine> {
    let partition = CategoryPartition::build(entities);
    let mut lines = Vec::with_capacity(pair_count(entities));

    for (category, ids) in partition.iter() {
        for &i in ids {
            for &j in ids {
                if i == j {
                    continue;
                }
                lines.push(ConnectionLine {
                    category,
                    from: vertex(&entities[i]),
                    to: vertex(&entities[j]),
                });
            }
        }
    }
    lines
}

/// Number of lines [`connection_lines`] will produce for `entities`.
pub fn pair_count(entities: &[Entity]) -> usize {
    let mut counts = [0usize; Category::COUNT];
    for e in entities {
        counts[e.category().index()] += 1;
    }
    counts.iter().map(|&n| n * n.saturating_sub(1)).sum()
}

#[inline]
fn vertex(e: &Entity) -> LineVertex {
    LineVertex {
        pos: e.position,
        color: e.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_lines_for_singletons_or_empty() {
        assert!(connection_lines(&[]).is_empty());

        let entities = vec![
            Entity::at(Vec3::ZERO, Category::Teapot),
            Entity::at(Vec3::X, Category::Cube),
        ];
        assert!(connection_lines(&entities).is_empty());
        assert_eq!(pair_count(&entities), 0);
    }

    #[test]
    fn every_ordered_pair_within_a_category_is_connected() {
        let entities = vec![
            Entity::at(Vec3::new(0.0, 0.0, 0.0), Category::Sphere),
            Entity::at(Vec3::new(1.0, 0.0, 0.0), Category::Sphere),
            Entity::at(Vec3::new(9.0, 9.0, 9.0), Category::Troll),
            Entity::at(Vec3::new(2.0, 0.0, 0.0), Category::Sphere),
        ];

        let lines = connection_lines(&entities);

        assert_eq!(lines.len(), 6);
        assert_eq!(pair_count(&entities), 6);
        assert!(lines.iter().all(|l| l.category == Category::Sphere));
        assert!(lines.iter().all(|l| l.from.pos != l.to.pos));

        let xs = [0.0, 1.0, 2.0];
        for a in xs {
            for b in xs {
                if a == b {
                    continue;
                }
                assert!(
                    lines.iter().any(|l| l.from.pos.x == a && l.to.pos.x == b),
                    "missing line {a} -> {b}"
                );
            }
        }
    }

    #[test]
    fn lines_never_cross_categories() {
        let entities = vec![
            Entity::at(Vec3::ZERO, Category::Cube),
            Entity::at(Vec3::X, Category::Teapot),
            Entity::at(Vec3::Y, Category::Cube),
            Entity::at(Vec3::Z, Category::Teapot),
            Entity::at(Vec3::ONE, Category::Teapot),
        ];

        let lines = connection_lines(&entities);

        assert_eq!(lines.len(), 2 + 6);
        for l in &lines {
            let from = entities.iter().find(|e| e.position == l.from.pos).unwrap();
            let to = entities.iter().find(|e| e.position == l.to.pos).unwrap();
            assert_eq!(from.category(), l.category);
            assert_eq!(to.category(), l.category);
        }
    }

    #[test]
    fn line_vertices_carry_entity_colors() {
        let mut a = Entity::at(Vec3::ZERO, Category::Troll);
        let mut b = Entity::at(Vec3::X, Category::Troll);
        a.color = Vec4::new(1.0, 0.0, 0.0, 1.0);
        b.color = Vec4::new(0.0, 0.0, 1.0, 1.0);

        let lines = connection_lines(&[a.clone(), b.clone()]);

        assert_eq!(lines[0].from.color, a.color);
        assert_eq!(lines[0].to.color, b.color);
        assert_eq!(lines[1].from.color, b.color);
    }
}
