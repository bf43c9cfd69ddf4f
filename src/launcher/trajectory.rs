//! Closed-form launch solver.
//!
//! Given a launch point, a target point and the height the arc should peak
//! at, [`solve`] returns the initial velocity that carries a projectile from
//! one to the other under constant vertical acceleration, together with the
//! time the flight takes.
//!
//! ## Derivation
//!
//! The vertical motion is split at the apex:
//!
//! | Phase   | Height travelled | Time                          |
//! |---------|------------------|-------------------------------|
//! | ascent  | `h`              | `sqrt(2·h / |g|)`             |
//! | descent | `h − Δy`         | `sqrt(2·(h − Δy) / |g|)`      |
//!
//! The launch speed along the vertical axis is `sqrt(2·|g|·h)` and the
//! horizontal velocity is the horizontal displacement divided by the total
//! flight time.  All heights are measured *against* gravity, so the same
//! formulas serve an inverted world where gravity points toward +Y.

use crate::constants::MIN_APEX_HEIGHT;
use crate::error::{validate_gravity, LauncherResult};
use bevy::prelude::*;

/// Validated, constant vertical acceleration.
///
/// Construction is the only place zero or non-finite gravity is rejected;
/// every other function in this module takes a `GravityField` and can rely on
/// `y != 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityField {
    y: f32,
}

impl GravityField {
    /// Wrap `gravity_y` (u/s², negative = downward).
    pub fn new(gravity_y: f32) -> LauncherResult<Self> {
        validate_gravity(gravity_y)?;
        Ok(Self { y: gravity_y })
    }

    /// Signed acceleration along Y.
    #[inline]
    pub fn y(self) -> f32 {
        self.y
    }

    /// Unsigned magnitude of the acceleration.
    #[inline]
    pub fn magnitude(self) -> f32 {
        self.y.abs()
    }

    /// `+1.0` when gravity pulls toward −Y, `−1.0` in an inverted world.
    ///
    /// Multiplying a world-space height by this value gives the height
    /// measured against gravity.
    #[inline]
    pub fn loft_sign(self) -> f32 {
        -self.y.signum()
    }

    /// Acceleration as a world-space vector.
    #[inline]
    pub fn acceleration(self) -> Vec3 {
        Vec3::Y * self.y
    }
}

/// Initial velocity and flight time for one predicted shot.
///
/// Recomputed every tick while charging and once more at fire time; never
/// stored across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSolution {
    /// Velocity to hand to the physics body at launch.
    pub initial_velocity: Vec3,
    /// Seconds from launch until the projectile reaches the target.  Always > 0.
    pub time_to_target: f32,
    /// Apex height actually used, after clamping (measured against gravity).
    pub apex_height: f32,
}

/// Raise `max_apex_height` until the solve is well-defined.
///
/// The apex must sit at or above the target (otherwise the descent time needs
/// the square root of a negative number) and must be strictly positive.
/// NaN inputs collapse to the floor.
#[inline]
pub fn clamp_apex_height(max_apex_height: f32, displacement_y: f32) -> f32 {
    max_apex_height.max(displacement_y).max(MIN_APEX_HEIGHT)
}

/// Solve for the launch velocity from `launch` to `target`.
///
/// `max_apex_height` is measured from the launch point against gravity and is
/// clamped with [`clamp_apex_height`] first, so any finite input yields a
/// finite, fireable arc with `time_to_target > 0`.
pub fn solve(
    launch: Vec3,
    target: Vec3,
    max_apex_height: f32,
    gravity: GravityField,
) -> LaunchSolution {
    let loft = gravity.loft_sign();
    let g = gravity.magnitude();

    let displacement_y = (target.y - launch.y) * loft;
    let apex_height = clamp_apex_height(max_apex_height, displacement_y);

    let ascent_time = (2.0 * apex_height / g).sqrt();
    let descent_time = (2.0 * (apex_height - displacement_y) / g).sqrt();
    let time_to_target = ascent_time + descent_time;

    let velocity_y = (2.0 * g * apex_height).sqrt();
    let displacement_xz = Vec3::new(target.x - launch.x, 0.0, target.z - launch.z);
    let velocity_xz = displacement_xz / time_to_target;

    LaunchSolution {
        initial_velocity: velocity_xz + Vec3::Y * velocity_y * loft,
        time_to_target,
        apex_height,
    }
}
