use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;

use lobber::config::{self, LauncherConfig};
use lobber::launcher::LauncherPlugin;

mod scene;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Lobber".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.9)))
    // Insert LauncherConfig with compiled defaults; load_launcher_config will
    // overwrite it from assets/launcher.toml (if present) in the Startup schedule.
    .insert_resource(LauncherConfig::default())
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
    .add_plugins(LauncherPlugin)
    .add_systems(
        Startup,
        (
            // Load config first so every other startup system sees the final values.
            config::load_launcher_config,
            scene::setup_camera.after(config::load_launcher_config),
            scene::setup_world,
        ),
    )
    .add_systems(
        Update,
        scene::camera_look_system.before(lobber::launcher::launcher_tick_system),
    );

    app.run();
}
