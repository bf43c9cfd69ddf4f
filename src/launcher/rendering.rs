//! Gizmo rendering for the predicted arc, the aim point and live projectiles.

use super::state::{Launcher, PredictedPath, Projectile};
use super::controller::ChargeState;
use crate::config::LauncherConfig;
use bevy::prelude::*;

const PATH_COLOR: Color = Color::srgb(1.0, 0.5, 0.0);
const RETICLE_COLOR: Color = Color::srgb(0.2, 1.0, 0.4);
const COOLING_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);
const PROJECTILE_COLOR: Color = Color::srgb(1.0, 0.9, 0.2);

/// Draw the latest predicted arc as a line strip.
pub fn predicted_path_gizmo_system(mut gizmos: Gizmos, path: Res<PredictedPath>) {
    if path.points.len() < 2 {
        return;
    }
    gizmos.linestrip(path.points.iter().copied(), PATH_COLOR);
}

/// Draw a flat ring at each launcher's aim point; grey while cooling down.
pub fn aim_point_gizmo_system(mut gizmos: Gizmos, q_launchers: Query<&Launcher>) {
    // Gizmo circles lie in the XY plane; tip them onto the ground.
    let flat = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
    for launcher in q_launchers.iter() {
        let color = match launcher.controller.state() {
            ChargeState::Cooling => COOLING_COLOR,
            _ => RETICLE_COLOR,
        };
        let point = launcher.controller.aim_point();
        gizmos.circle(Isometry3d::new(point, flat), 0.5, color);
    }
}

/// Draw every live projectile as a wire sphere.
pub fn projectile_gizmo_system(
    mut gizmos: Gizmos,
    q_projectiles: Query<&Transform, With<Projectile>>,
    config: Res<LauncherConfig>,
) {
    for transform in q_projectiles.iter() {
        gizmos.sphere(
            Isometry3d::from_translation(transform.translation),
            config.projectile_radius,
            PROJECTILE_COLOR,
        );
    }
}
