use std::fmt;
use std::str::FromStr;

use glam::{Vec3, Vec4};
use rand::Rng;

use crate::error::CategoryError;

/// The closed set of categories an entity can belong to.
///
/// Each category is drawn as a different primitive and is attracted only
/// towards the centroid of its own members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Teapot,
    Cube,
    Sphere,
    Troll,
}

impl Category {
    pub const COUNT: usize = 4;

    /// All categories, in bucket order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Teapot,
        Category::Cube,
        Category::Sphere,
        Category::Troll,
    ];

    /// Position of this category in [`Category::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Teapot => "teapot",
            Category::Cube => "cube",
            Category::Sphere => "sphere",
            Category::Troll => "troll",
        }
    }

    /// Picks a category uniformly at random.
    pub fn random(rng: &mut impl Rng) -> Self {
        Category::ALL[rng.random_range(0..Category::COUNT)]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for Category {
    type Error = CategoryError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Category::ALL
            .get(code as usize)
            .copied()
            .ok_or(CategoryError::UnknownCode(code))
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    /// Accepts a shape label or the letters `a`-`d`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teapot" | "a" => Ok(Category::Teapot),
            "cube" | "b" => Ok(Category::Cube),
            "sphere" | "c" => Ok(Category::Sphere),
            "troll" | "d" => Ok(Category::Troll),
            _ => Err(CategoryError::UnknownName(s.to_owned())),
        }
    }
}

/// One simulated object.
///
/// `position`, `direction` and `distance` are owned by the simulator;
/// `scale`, `rotation` and `color` are only carried through for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: Vec3,
    /// Unit direction towards the category centroid, or zero.
    pub direction: Vec3,
    pub scale: Vec3,
    /// Euler angles in degrees; only the yaw (`y`) is randomized.
    pub rotation: Vec3,
    pub color: Vec4,
    category: Category,
    /// Distance to the centroid measured in the last tick.
    pub distance: f32,
}

impl Entity {
    pub fn new(position: Vec3, scale: Vec3, rotation: Vec3, color: Vec4, category: Category) -> Self {
        Self {
            position,
            direction: Vec3::ZERO,
            scale,
            rotation,
            color,
            category,
            distance: 0.0,
        }
    }

    /// Convenience constructor for an entity with unit scale, no rotation and white color.
    pub fn at(position: Vec3, category: Category) -> Self {
        Self::new(position, Vec3::ONE, Vec3::ZERO, Vec4::ONE, category)
    }

    /// Spawns an entity on the ground plane.
    ///
    /// `x` and `z` are uniform in `[-half_extent, half_extent]`, `y` is
    /// zero, the yaw is uniform in `[0, 360)` degrees, the scale is one
    /// and the color is a random opaque RGB.
    pub fn random(category: Category, half_extent: f32, rng: &mut impl Rng) -> Self {
        let x = rng.random_range(-half_extent..=half_extent);
        let z = rng.random_range(-half_extent..=half_extent);
        let yaw = rng.random_range(0.0..360.0);
        let color = Vec4::new(rng.random(), rng.random(), rng.random(), 1.0);

        Self::new(
            Vec3::new(x, 0.0, z),
            Vec3::ONE,
            Vec3::new(0.0, yaw, 0.0),
            color,
            category,
        )
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Yaw in degrees the renderer should face the entity towards.
    ///
    /// Follows the current attraction direction when it has a ground-plane
    /// component, and falls back to the stored rotation otherwise.
    pub fn facing_yaw(&self) -> f32 {
        let flat = Vec3::new(self.direction.x, 0.0, self.direction.z);
        if flat.length_squared() > 0.0 {
            flat.x.atan2(flat.z).to_degrees().rem_euclid(360.0)
        } else {
            self.rotation.y
        }
    }
}
