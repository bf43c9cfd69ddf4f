//! Launcher input, tick and projectile-lifetime systems.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`fire_input_system`] — translates mouse / keyboard into [`LauncherIntent`].
//! 2. [`launcher_tick_system`] — ticks every [`Launcher`]'s controller against
//!    Rapier ray casts, spawns projectiles through `Commands`, and publishes the
//!    predicted arc to [`PredictedPath`].
//! 3. [`reticle_follow_system`] — moves the [`AimReticle`] onto the aim point.
//!
//! Also contains helper systems that are not part of the tick pipeline:
//! - [`despawn_expired_projectiles_system`] — projectile lifetime
//! - [`projectile_camera_lock_system`] — optional camera follow of the last shot
//! - [`sync_rapier_gravity_system`] — keeps Rapier's gravity equal to the predictor's

use super::aim::LaunchMode;
use super::controller::{FireInput, ProjectileSpawner, TickContext};
use super::state::{
    AimReticle, Launcher, LauncherCamera, LauncherIntent, PredictedPath, Projectile,
    ProjectileCameraLock,
};
use crate::config::LauncherConfig;
use bevy::prelude::*;
use bevy_rapier3d::geometry::Group;
use bevy_rapier3d::prelude::*;

/// Collision group projectiles belong to.  Aim rays never see it.
pub const PROJECTILE_GROUP: Group = Group::GROUP_2;

/// Collision groups used by every aim ray: the world, but not projectiles.
pub fn aim_ray_groups() -> CollisionGroups {
    CollisionGroups::new(Group::GROUP_1, Group::GROUP_1)
}

// ── Step 1: Input → Intent ────────────────────────────────────────────────────

/// Turns the combined fire-button level into [`FireInput`] edges.
///
/// Several physical buttons share one logical fire button: it is down while
/// any of them is down.  A tap that both starts and ends inside one frame
/// never shows up in the level, so it is reported as `Down` with the
/// matching `Up` held back for the next frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireButton {
    was_pressed: bool,
    pending_release: bool,
}

impl FireButton {
    /// Advance one frame.
    ///
    /// `pressed` is the combined level this frame; `tapped` is set when any
    /// source was pressed this frame, even if it is already released again.
    pub fn update(&mut self, pressed: bool, tapped: bool) -> FireInput {
        let was_pressed = self.was_pressed;
        self.was_pressed = pressed;

        if self.pending_release {
            self.pending_release = false;
            return FireInput::Up;
        }

        match (was_pressed, pressed) {
            (false, true) => FireInput::Down,
            (true, true) => FireInput::Held,
            (true, false) => FireInput::Up,
            (false, false) if tapped => {
                self.pending_release = true;
                FireInput::Down
            }
            (false, false) => FireInput::None,
        }
    }
}

/// Translate left-click / Space, the mode keys and Left Shift into [`LauncherIntent`].
///
/// - **LMB / Space** → `fire` (one logical button, see [`FireButton`])
/// - **1 / 2 / 3** → `TrackRaycast` / `FollowForwardGroundSnap` / `SnapInstant`
/// - **Left Shift** → toggle the projectile camera lock
pub fn fire_input_system(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut fire_button: Local<FireButton>,
    mut intent: ResMut<LauncherIntent>,
) {
    let fire = fire_button.update(
        mouse_buttons.pressed(MouseButton::Left) || keys.pressed(KeyCode::Space),
        mouse_buttons.just_pressed(MouseButton::Left) || keys.just_pressed(KeyCode::Space),
    );

    let select_mode = if keys.just_pressed(KeyCode::Digit1) {
        Some(LaunchMode::TrackRaycast)
    } else if keys.just_pressed(KeyCode::Digit2) {
        Some(LaunchMode::FollowForwardGroundSnap)
    } else if keys.just_pressed(KeyCode::Digit3) {
        Some(LaunchMode::SnapInstant)
    } else {
        None
    };

    *intent = LauncherIntent {
        fire,
        select_mode,
        toggle_camera_lock: keys.just_pressed(KeyCode::ShiftLeft),
    };
}

// ── Step 2: Tick ──────────────────────────────────────────────────────────────

/// Spawns Rapier rigid bodies through `Commands`.
pub struct CommandSpawner<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    radius: f32,
    last_spawned: Option<Entity>,
}

impl<'a, 'w, 's> CommandSpawner<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>, radius: f32) -> Self {
        Self {
            commands,
            radius,
            last_spawned: None,
        }
    }

    /// Entity created by the most recent [`ProjectileSpawner::spawn`] call.
    pub fn last_spawned(&self) -> Option<Entity> {
        self.last_spawned
    }
}

/// Handle returned by [`CommandSpawner`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnedProjectile {
    pub entity: Entity,
    pub origin: Vec3,
}

impl ProjectileSpawner for CommandSpawner<'_, '_, '_> {
    type Handle = SpawnedProjectile;

    fn spawn(&mut self, position: Vec3, orientation: Quat) -> SpawnedProjectile {
        let entity = self
            .commands
            .spawn((
                Projectile::default(),
                Transform::from_translation(position).with_rotation(orientation),
                Visibility::default(),
                RigidBody::Dynamic,
                Collider::ball(self.radius),
                Velocity::zero(),
                Ccd::enabled(),
                CollisionGroups::new(PROJECTILE_GROUP, Group::ALL),
            ))
            .id();
        self.last_spawned = Some(entity);
        SpawnedProjectile {
            entity,
            origin: position,
        }
    }

    fn launch_origin(&self, projectile: &SpawnedProjectile) -> Vec3 {
        projectile.origin
    }

    fn set_initial_velocity(&mut self, projectile: &SpawnedProjectile, velocity: Vec3) {
        self.commands
            .entity(projectile.entity)
            .insert(Velocity::linear(velocity));
    }
}

/// Tick every launcher's controller once.
///
/// Runs in every state so the cooldown keeps counting without input.  With
/// no [`LauncherCamera`] the launcher's own forward ray stands in for the
/// camera; with no Rapier context every ray misses.
#[allow(clippy::too_many_arguments)]
pub fn launcher_tick_system(
    mut commands: Commands,
    mut q_launchers: Query<(&Transform, &mut Launcher)>,
    q_camera: Query<&Transform, (With<LauncherCamera>, Without<Launcher>)>,
    rapier_context: ReadRapierContext,
    intent: Res<LauncherIntent>,
    time: Res<Time>,
    config: Res<LauncherConfig>,
    mut path: ResMut<PredictedPath>,
    mut lock: ResMut<ProjectileCameraLock>,
) {
    let dt = time.delta_secs();
    let rapier = rapier_context.single().ok();
    let filter = QueryFilter::new().groups(aim_ray_groups());

    let environment = |origin: Vec3, direction: Dir3, max_distance: f32| -> Option<Vec3> {
        let context = rapier.as_ref()?;
        context
            .cast_ray(origin, *direction, max_distance, true, filter)
            .map(|(_, toi)| origin + *direction * toi)
    };

    for (transform, mut launcher) in q_launchers.iter_mut() {
        if let Some(mode) = intent.select_mode {
            launcher.controller.set_launch_mode(mode);
            info!("Launch mode: {mode:?}");
        }

        let camera_ray = aim_ray(q_camera.single().ok(), transform);

        let mut spawner = CommandSpawner::new(&mut commands, config.projectile_radius);
        let output = launcher.controller.tick(
            intent.fire,
            dt,
            TickContext {
                launcher: transform,
                camera_ray,
                environment: &environment,
                spawner: &mut spawner,
            },
        );

        if let Some(points) = output.path {
            path.points = points;
        }
        if output.fired.is_some() {
            lock.target = spawner.last_spawned();
        }
        if output.cooldown_finished {
            path.points.clear();
        }
    }
}

/// Look ray for the aim modes: the camera's, or the launcher's own forward
/// ray when there is no camera.
///
/// Reads `Transform` rather than `GlobalTransform` so this frame's look
/// input is seen before transform propagation runs.
pub fn aim_ray(camera: Option<&Transform>, launcher: &Transform) -> Ray3d {
    let eye = camera.unwrap_or(launcher);
    Ray3d::new(eye.translation, eye.forward())
}

// ── Step 3: Reticle ───────────────────────────────────────────────────────────

/// Place the [`AimReticle`] on the launcher's current aim point.
pub fn reticle_follow_system(
    q_launcher: Query<&Launcher>,
    mut q_reticle: Query<&mut Transform, With<AimReticle>>,
) {
    let Ok(launcher) = q_launcher.single() else {
        return;
    };
    for mut transform in q_reticle.iter_mut() {
        transform.translation = launcher.controller.aim_point();
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Age projectiles and despawn them once they outlive `projectile_lifetime`.
pub fn despawn_expired_projectiles_system(
    mut commands: Commands,
    mut q_projectiles: Query<(Entity, &mut Projectile)>,
    time: Res<Time>,
    config: Res<LauncherConfig>,
    mut lock: ResMut<ProjectileCameraLock>,
) {
    let dt = time.delta_secs();
    for (entity, mut projectile) in q_projectiles.iter_mut() {
        projectile.age += dt;
        if projectile.age >= config.projectile_lifetime {
            commands.entity(entity).despawn();
            if lock.target == Some(entity) {
                lock.target = None;
            }
        }
    }
}

/// Toggle the camera lock and, while locked, turn the camera toward the last shot.
pub fn projectile_camera_lock_system(
    intent: Res<LauncherIntent>,
    mut lock: ResMut<ProjectileCameraLock>,
    mut q_camera: Query<&mut Transform, With<LauncherCamera>>,
    q_projectiles: Query<&Transform, (With<Projectile>, Without<LauncherCamera>)>,
) {
    if intent.toggle_camera_lock {
        lock.locked = !lock.locked;
        info!(
            "Projectile camera lock {}",
            if lock.locked { "on" } else { "off" }
        );
    }
    if !lock.locked {
        return;
    }

    let Some(target) = lock.target else {
        return;
    };
    let Ok(projectile) = q_projectiles.get(target) else {
        return;
    };
    for mut camera in q_camera.iter_mut() {
        if camera.translation != projectile.translation {
            camera.look_at(projectile.translation, Vec3::Y);
        }
    }
}

/// Startup system: make Rapier integrate with the same gravity the arc predictor uses.
pub fn sync_rapier_gravity_system(
    config: Res<LauncherConfig>,
    mut q_rapier: Query<&mut RapierConfiguration>,
) {
    for mut rapier in q_rapier.iter_mut() {
        rapier.gravity = Vec3::Y * config.gravity_y;
    }
}
