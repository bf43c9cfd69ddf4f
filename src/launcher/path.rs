//! Predicted-path sampling for display.
//!
//! Pure and stateless: the same solution always yields the same polyline.

use super::trajectory::{GravityField, LaunchSolution};
use bevy::prelude::*;

/// Position of a projectile `t` seconds after leaving `origin`.
#[inline]
pub fn point_at(origin: Vec3, solution: &LaunchSolution, gravity: GravityField, t: f32) -> Vec3 {
    origin + solution.initial_velocity * t + gravity.acceleration() * t * t * 0.5
}

/// Sample the arc described by `solution` into `resolution + 1` evenly timed
/// points, from the launch point (`t = 0`) to the landing point
/// (`t = time_to_target`).
///
/// A `resolution` of zero yields only the origin.
pub fn sample_path(
    origin: Vec3,
    solution: &LaunchSolution,
    gravity: GravityField,
    resolution: usize,
) -> Vec<Vec3> {
    if resolution == 0 {
        return vec![origin];
    }
    (0..=resolution)
        .map(|i| {
            let t = i as f32 / resolution as f32 * solution.time_to_target;
            point_at(origin, solution, gravity, t)
        })
        .collect()
}
