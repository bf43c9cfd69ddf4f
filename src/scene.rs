//! Demo scene: lit ground, scattered obstacle blocks, and an arrow-key look camera.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use lobber::launcher::{Launcher, LauncherCamera, ProjectileCameraLock};
use rand::Rng;

const GROUND_HALF_EXTENT: f32 = 100.0;
const OBSTACLE_COUNT: usize = 40;
/// Camera offset from the launcher, in the launcher's local frame.
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 3.0, 6.0);
/// Look speed (rad/s) for the arrow keys.
const LOOK_SPEED: f32 = 1.5;
const MAX_PITCH: f32 = 1.4;

/// Yaw / pitch of the look camera, in radians.
#[derive(Resource, Default)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

/// Spawn the look camera behind the launcher, angled slightly down.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        LauncherCamera,
        Transform::from_translation(CAMERA_OFFSET).looking_at(Vec3::new(0.0, 0.0, -10.0), Vec3::Y),
    ));
    commands.insert_resource(LookAngles {
        yaw: 0.0,
        pitch: -0.3,
    });
    info!("Camera spawned");
}

/// Ground plane, a light, and randomly placed box obstacles to lob over.
pub fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(GROUND_HALF_EXTENT * 2.0, 1.0, GROUND_HALF_EXTENT * 2.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.35, 0.3))),
        Transform::from_xyz(0.0, -0.5, 0.0),
        Collider::cuboid(GROUND_HALF_EXTENT, 0.5, GROUND_HALF_EXTENT),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let mut rng = rand::thread_rng();
    let block_material = materials.add(Color::srgb(0.55, 0.45, 0.35));
    for _ in 0..OBSTACLE_COUNT {
        let half = Vec3::new(
            rng.gen_range(0.5..3.0),
            rng.gen_range(0.5..4.0),
            rng.gen_range(0.5..3.0),
        );
        let position = Vec3::new(
            rng.gen_range(-60.0..60.0),
            half.y,
            rng.gen_range(-80.0..-8.0),
        );
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(half * 2.0))),
            MeshMaterial3d(block_material.clone()),
            Transform::from_translation(position),
            Collider::cuboid(half.x, half.y, half.z),
        ));
    }
    info!("World spawned with {OBSTACLE_COUNT} obstacles");
}

/// Arrow keys turn the camera; the launcher yaws with it so "forward" is
/// where the player looks.  Disabled while the projectile camera lock is on.
pub fn camera_look_system(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    lock: Res<ProjectileCameraLock>,
    mut angles: ResMut<LookAngles>,
    mut q_launcher: Query<&mut Transform, With<Launcher>>,
    mut q_camera: Query<&mut Transform, (With<LauncherCamera>, Without<Launcher>)>,
) {
    if lock.locked {
        return;
    }
    let step = LOOK_SPEED * time.delta_secs();
    if keys.pressed(KeyCode::ArrowLeft) {
        angles.yaw += step;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        angles.yaw -= step;
    }
    if keys.pressed(KeyCode::ArrowUp) {
        angles.pitch = (angles.pitch + step).min(MAX_PITCH);
    }
    if keys.pressed(KeyCode::ArrowDown) {
        angles.pitch = (angles.pitch - step).max(-MAX_PITCH);
    }

    let Ok(mut launcher) = q_launcher.single_mut() else {
        return;
    };
    launcher.rotation = Quat::from_rotation_y(angles.yaw);

    let Ok(mut camera) = q_camera.single_mut() else {
        return;
    };
    camera.translation = launcher.translation + launcher.rotation * CAMERA_OFFSET;
    camera.rotation = Quat::from_euler(EulerRot::YXZ, angles.yaw, angles.pitch, 0.0);
}
