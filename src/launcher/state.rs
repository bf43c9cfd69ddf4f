//! Launcher components and resources.
//!
//! All ECS components and Bevy resources that describe launcher state live here.
//! Systems that mutate this state are in the sibling modules:
//! - [`super::systems`] — input, ticking the controller, projectile lifetime
//! - [`super::rendering`] — gizmo drawing of the predicted arc

use super::aim::LaunchMode;
use super::controller::{ChargeFireController, FireInput};
use bevy::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// The launcher entity.  Its `Transform` is the launch pose.
#[derive(Component, Debug, Clone)]
pub struct Launcher {
    pub controller: ChargeFireController,
}

/// Marker for the camera whose look ray drives the raycast aim modes.
#[derive(Component)]
pub struct LauncherCamera;

/// Marker for the landing-indicator entity that follows the aim point.
#[derive(Component)]
pub struct AimReticle;

/// Per-projectile state attached to each launched round.
#[derive(Component, Debug, Default)]
pub struct Projectile {
    /// Seconds since this projectile was spawned.
    pub age: f32,
}

// ── Resources ──────────────────────────────────────────────────────────────────

/// Latest predicted arc, for whatever draws it.
///
/// Rewritten every charging tick and once at fire time; cleared when the
/// cooldown ends.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PredictedPath {
    pub points: Vec<Vec3>,
}

/// Whether the camera is locked onto the most recent projectile.
///
/// Toggled with Left Shift.  While locked and the projectile lives, the
/// [`LauncherCamera`] keeps looking at it.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectileCameraLock {
    pub locked: bool,
    /// Most recently fired projectile, if it still exists.
    pub target: Option<Entity>,
}

// ── Input Abstraction ──────────────────────────────────────────────────────────

/// Aggregated launcher intent for the current frame.
///
/// [`super::systems::fire_input_system`] writes it from mouse / keyboard each
/// frame; [`super::systems::launcher_tick_system`] reads it.  Tests can
/// populate this directly to drive the launcher without a real input device.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct LauncherIntent {
    pub fire: FireInput,
    /// Switch aim behaviour before this frame's tick.
    pub select_mode: Option<LaunchMode>,
    /// Flip [`ProjectileCameraLock::locked`].
    pub toggle_camera_lock: bool,
}
