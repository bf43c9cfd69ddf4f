//! Launcher module: arc prediction, charge/fire control, and the Bevy glue around them.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`trajectory`] | Closed-form launch solver (`solve`, `GravityField`, `LaunchSolution`) |
//! | [`path`] | Fixed-resolution sampling of a solved arc for display |
//! | [`aim`] | `AimTargetTracker` and the three `LaunchMode` behaviours |
//! | [`controller`] | `ChargeFireController` state machine (Idle → Charging → Cooling) |
//! | [`state`] | ECS components (`Launcher`, `Projectile`, markers) and resources (`PredictedPath`, `LauncherIntent`) |
//! | [`systems`] | Input, tick, reticle, projectile lifetime and camera-lock systems |
//! | [`rendering`] | Gizmo drawing of the arc, aim point and projectiles |
//!
//! `trajectory`, `path`, `aim` and `controller` have no ECS dependencies
//! beyond Bevy's math types; everything that touches the world goes through
//! the `EnvironmentQuery` and `ProjectileSpawner` traits.

pub mod aim;
pub mod controller;
pub mod path;
pub mod rendering;
pub mod state;
pub mod systems;
pub mod trajectory;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use aim::{AimTargetTracker, AimTuning, AimView, EnvironmentQuery, LaunchMode};
pub use controller::{
    ChargeFireController, ChargeState, FireInput, ProjectileSpawner, TickContext, TickOutput,
};
pub use path::{point_at, sample_path};
pub use rendering::{aim_point_gizmo_system, predicted_path_gizmo_system, projectile_gizmo_system};
pub use state::{
    AimReticle, Launcher, LauncherCamera, LauncherIntent, PredictedPath, Projectile,
    ProjectileCameraLock,
};
pub use systems::{
    aim_ray, despawn_expired_projectiles_system, fire_input_system, launcher_tick_system,
    projectile_camera_lock_system, reticle_follow_system, sync_rapier_gravity_system, FireButton,
};
pub use trajectory::{clamp_apex_height, solve, GravityField, LaunchSolution};

use crate::config::{load_launcher_config, LauncherConfig};
use bevy::prelude::*;

/// Registers launcher resources and systems.
///
/// Expects a [`LauncherConfig`] resource and Rapier's physics plugin to be
/// added by the app.
pub struct LauncherPlugin;

impl Plugin for LauncherPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LauncherIntent>()
            .init_resource::<PredictedPath>()
            .init_resource::<ProjectileCameraLock>()
            .add_systems(
                Startup,
                (spawn_launcher, sync_rapier_gravity_system).after(load_launcher_config),
            )
            .add_systems(
                Update,
                (
                    fire_input_system,
                    launcher_tick_system,
                    reticle_follow_system,
                    projectile_camera_lock_system,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    despawn_expired_projectiles_system,
                    predicted_path_gizmo_system,
                    aim_point_gizmo_system,
                    projectile_gizmo_system,
                ),
            );
    }
}

/// Height of the launch point above the world origin.
const LAUNCHER_HEIGHT: f32 = 1.0;

// ── Launcher spawn ─────────────────────────────────────────────────────────────

/// Spawn the launcher (facing −Z) and its aim reticle.
///
/// A configuration the solver cannot use is logged and nothing is spawned.
pub fn spawn_launcher(mut commands: Commands, config: Res<LauncherConfig>) {
    let transform = Transform::from_xyz(0.0, LAUNCHER_HEIGHT, 0.0);
    let controller = match ChargeFireController::new(&config, transform.translation) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Launcher not spawned: {e}");
            return;
        }
    };

    commands.spawn((
        Launcher { controller },
        transform,
        Visibility::default(),
    ));
    commands.spawn((AimReticle, transform, Visibility::default()));

    info!(
        "Launcher spawned at {:?} ({:?} mode)",
        transform.translation, config.launch_mode
    );
}
