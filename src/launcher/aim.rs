//! Aim-point tracking: where the projectile would currently land.
//!
//! One [`AimTargetTracker`] serves every [`LaunchMode`]; the mode tag picks
//! the behaviour each tick.
//!
//! | Mode | Per-tick behaviour | Chargeable |
//! |------|--------------------|------------|
//! | `TrackRaycast` | Walk toward a camera-ray hit cached on the first tick of the charge | yes |
//! | `FollowForwardGroundSnap` | Snap down onto the ground, then push forward by a growing step | yes |
//! | `SnapInstant` | Jump straight to the current camera-ray hit | no |
//!
//! A ray that hits nothing leaves the aim point where it is.

use bevy::prelude::*;
use serde::Deserialize;

use crate::config::LauncherConfig;

/// Selects how the aim point evolves while the fire button is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    /// Cache the camera-ray hit once per charge and walk toward it.
    #[default]
    TrackRaycast,
    /// Follow the launcher's forward axis while hugging the ground.
    FollowForwardGroundSnap,
    /// Place the aim point on the camera-ray hit every tick.
    SnapInstant,
}

impl LaunchMode {
    /// `true` when holding the button longer changes where the shot lands.
    pub fn is_chargeable(self) -> bool {
        matches!(
            self,
            LaunchMode::TrackRaycast | LaunchMode::FollowForwardGroundSnap
        )
    }
}

/// World query used to resolve aim rays.
///
/// Returning `None` means "nothing hit" and is never an error.
pub trait EnvironmentQuery {
    /// Cast a ray and return the first hit point within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Vec3>;
}

impl<F> EnvironmentQuery for F
where
    F: Fn(Vec3, Dir3, f32) -> Option<Vec3>,
{
    fn raycast(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Vec3> {
        self(origin, direction, max_distance)
    }
}

/// Aim-related tuning values, copied out of [`LauncherConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimTuning {
    pub track_speed: f32,
    pub forward_growth_rate: f32,
    pub ground_snap_min_offset: f32,
    pub ground_snap_pitch_scale: f32,
    pub ray_max_distance: f32,
}

impl From<&LauncherConfig> for AimTuning {
    fn from(config: &LauncherConfig) -> Self {
        Self {
            track_speed: config.aim_track_speed,
            forward_growth_rate: config.forward_growth_rate,
            ground_snap_min_offset: config.ground_snap_min_offset,
            ground_snap_pitch_scale: config.ground_snap_pitch_scale,
            ray_max_distance: config.aim_ray_max_distance,
        }
    }
}

/// The two directions an aim tick needs: the camera's look ray and the
/// launcher's forward axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimView {
    pub camera_ray: Ray3d,
    pub launcher_forward: Dir3,
}

/// Cached camera-ray result for `TrackRaycast`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Destination {
    /// No ray cast yet this charge.
    #[default]
    Unresolved,
    /// The one ray this charge hit nothing.
    Missed,
    Resolved(Vec3),
}

/// Owns the aim point and the per-charge accumulators behind it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AimTargetTracker {
    position: Vec3,
    destination: Destination,
    forward_step: f32,
}

impl AimTargetTracker {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Current aim point (world space).
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Destination cached by `TrackRaycast`, if the charge has resolved one.
    pub fn cached_destination(&self) -> Option<Vec3> {
        match self.destination {
            Destination::Resolved(point) => Some(point),
            _ => None,
        }
    }

    /// Forward step accumulated by `FollowForwardGroundSnap` this charge.
    #[inline]
    pub fn forward_step(&self) -> f32 {
        self.forward_step
    }

    /// Forget per-charge state: the cached destination and the forward step.
    pub fn begin_charge(&mut self) {
        self.destination = Destination::Unresolved;
        self.forward_step = 0.0;
    }

    /// Move the aim point back to `position` and clear per-charge state.
    pub fn reset_to(&mut self, position: Vec3) {
        self.position = position;
        self.begin_charge();
    }

    /// Advance the aim point by one tick of `dt` seconds and return it.
    pub fn advance<E: EnvironmentQuery>(
        &mut self,
        mode: LaunchMode,
        view: &AimView,
        dt: f32,
        environment: &E,
        tuning: &AimTuning,
    ) -> Vec3 {
        match mode {
            LaunchMode::TrackRaycast => self.track_raycast(view, dt, environment, tuning),
            LaunchMode::FollowForwardGroundSnap => {
                self.follow_forward(view, dt, environment, tuning)
            }
            LaunchMode::SnapInstant => self.snap_instant(view, environment, tuning),
        }
        self.position
    }

    fn track_raycast<E: EnvironmentQuery>(
        &mut self,
        view: &AimView,
        dt: f32,
        environment: &E,
        tuning: &AimTuning,
    ) {
        if self.destination == Destination::Unresolved {
            self.destination = match environment.raycast(
                view.camera_ray.origin,
                view.camera_ray.direction,
                tuning.ray_max_distance,
            ) {
                Some(hit) => Destination::Resolved(hit),
                None => Destination::Missed,
            };
        }

        if let Destination::Resolved(destination) = self.destination {
            self.position = move_towards(self.position, destination, tuning.track_speed * dt);
        }
    }

    fn follow_forward<E: EnvironmentQuery>(
        &mut self,
        view: &AimView,
        dt: f32,
        environment: &E,
        tuning: &AimTuning,
    ) {
        // Looking down lifts the ray start so steep ground can't swallow it.
        let pitch_offset = -view.camera_ray.direction.y * tuning.ground_snap_pitch_scale;
        let offset = tuning.ground_snap_min_offset.max(pitch_offset);
        let ray_origin = self.position + Vec3::Y * offset;

        if let Some(ground) = environment.raycast(ray_origin, Dir3::NEG_Y, tuning.ray_max_distance)
        {
            self.position = ground;
        }

        self.forward_step += tuning.forward_growth_rate * dt;
        self.position += *view.launcher_forward * self.forward_step;
    }

    fn snap_instant<E: EnvironmentQuery>(
        &mut self,
        view: &AimView,
        environment: &E,
        tuning: &AimTuning,
    ) {
        if let Some(hit) = environment.raycast(
            view.camera_ray.origin,
            view.camera_ray.direction,
            tuning.ray_max_distance,
        ) {
            self.position = hit;
        }
    }
}

/// Step from `current` toward `target` by at most `max_delta`, never overshooting.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + to_target / distance * max_delta
    }
}
