//! Small vector helpers on top of `glam` used by the attraction phase.

use glam::Vec3;

/// Arithmetic mean of `positions`, or `None` when there are none.
pub fn centroid(positions: impl IntoIterator<Item = Vec3>) -> Option<Vec3> {
    let mut sum = Vec3::ZERO;
    let mut n = 0usize;
    for p in positions {
        sum += p;
        n += 1;
    }
    if n == 0 {
        None
    } else {
        Some(sum / n as f32)
    }
}

/// Unit direction and distance from `from` towards `to`.
///
/// When the distance is not greater than `epsilon` the direction is
/// `Vec3::ZERO`, so a point sitting on its target never yields a NaN.
#[inline]
pub fn attraction(from: Vec3, to: Vec3, epsilon: f32) -> (Vec3, f32) {
    let delta = to - from;
    let distance = delta.length();
    if distance > epsilon {
        (delta / distance, distance)
    } else {
        (Vec3::ZERO, distance)
    }
}
