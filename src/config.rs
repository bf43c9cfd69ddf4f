//! Runtime launcher configuration loaded from `assets/launcher.toml`.
//!
//! [`LauncherConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_launcher_config`] reads
//! `assets/launcher.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about:
//!
//! ```toml
//! launch_mode = "follow_forward_ground_snap"
//! cooldown_secs = 0.5
//! ```
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/launcher.toml`.
//! 2. Restart the game — no recompilation required.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `LauncherConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_finite, validate_gravity, validate_non_negative, validate_path_resolution,
    LauncherError, LauncherResult,
};
use crate::launcher::aim::LaunchMode;
use bevy::prelude::*;
use serde::Deserialize;

/// Default location of the runtime override file.
pub const CONFIG_PATH: &str = "assets/launcher.toml";

/// Runtime-tunable launcher configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    // ── World ────────────────────────────────────────────────────────────────
    pub gravity_y: f32,

    // ── Aim Tracking ─────────────────────────────────────────────────────────
    pub launch_mode: LaunchMode,
    pub aim_track_speed: f32,
    pub forward_growth_rate: f32,
    pub ground_snap_min_offset: f32,
    pub ground_snap_pitch_scale: f32,
    pub aim_ray_max_distance: f32,

    // ── Arc Shaping ──────────────────────────────────────────────────────────
    pub apex_height_base: f32,
    pub apex_growth_rate: f32,

    // ── Firing ───────────────────────────────────────────────────────────────
    pub cooldown_secs: f32,
    pub path_resolution: usize,

    // ── Projectile ───────────────────────────────────────────────────────────
    pub projectile_lifetime: f32,
    pub projectile_radius: f32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            gravity_y: GRAVITY_Y,
            launch_mode: LaunchMode::default(),
            aim_track_speed: AIM_TRACK_SPEED,
            forward_growth_rate: FORWARD_GROWTH_RATE,
            ground_snap_min_offset: GROUND_SNAP_MIN_OFFSET,
            ground_snap_pitch_scale: GROUND_SNAP_PITCH_SCALE,
            aim_ray_max_distance: AIM_RAY_MAX_DISTANCE,
            apex_height_base: APEX_HEIGHT_BASE,
            apex_growth_rate: APEX_GROWTH_RATE,
            cooldown_secs: FIRE_COOLDOWN_SECS,
            path_resolution: PATH_RESOLUTION,
            projectile_lifetime: PROJECTILE_LIFETIME,
            projectile_radius: PROJECTILE_RADIUS,
        }
    }
}

impl LauncherConfig {
    /// Parse a TOML document and validate the result.
    ///
    /// Keys absent from `contents` keep their compiled defaults.
    pub fn from_toml_str(contents: &str) -> LauncherResult<Self> {
        let config: LauncherConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its safe range.
    ///
    /// Gravity is the only value the arc solver cannot tolerate at all, so it
    /// is checked first.
    pub fn validate(&self) -> LauncherResult<()> {
        validate_gravity(self.gravity_y)?;
        validate_non_negative("AIM_TRACK_SPEED", self.aim_track_speed)?;
        validate_non_negative("FORWARD_GROWTH_RATE", self.forward_growth_rate)?;
        validate_non_negative("GROUND_SNAP_MIN_OFFSET", self.ground_snap_min_offset)?;
        validate_non_negative("GROUND_SNAP_PITCH_SCALE", self.ground_snap_pitch_scale)?;
        validate_non_negative("AIM_RAY_MAX_DISTANCE", self.aim_ray_max_distance)?;
        validate_finite("APEX_HEIGHT_BASE", self.apex_height_base)?;
        validate_non_negative("APEX_GROWTH_RATE", self.apex_growth_rate)?;
        validate_non_negative("FIRE_COOLDOWN_SECS", self.cooldown_secs)?;
        validate_path_resolution(self.path_resolution)?;
        validate_non_negative("PROJECTILE_LIFETIME", self.projectile_lifetime)?;
        validate_non_negative("PROJECTILE_RADIUS", self.projectile_radius)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/launcher.toml` and overwrite the
/// `LauncherConfig` resource with the values in the file.
///
/// Missing keys retain their compiled defaults.  Parse errors (warn) and
/// validation failures (error) are logged and leave the defaults in place.  A missing file is not an
/// error (defaults are already in place from `insert_resource`).
pub fn load_launcher_config(mut config: ResMut<LauncherConfig>) {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => match LauncherConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded launcher config from {CONFIG_PATH}");
            }
            Err(e @ LauncherError::ConfigParse { .. }) => {
                warn!("Could not parse {CONFIG_PATH}: {e}; using defaults");
            }
            Err(e) => {
                error!("Rejected {CONFIG_PATH}: {e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {CONFIG_PATH} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_constants_and_validate() {
        let config = LauncherConfig::default();
        assert_eq!(config.gravity_y, GRAVITY_Y);
        assert_eq!(config.path_resolution, PATH_RESOLUTION);
        assert_eq!(config.launch_mode, LaunchMode::TrackRaycast);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config = LauncherConfig::from_toml_str(
            r#"
            launch_mode = "snap_instant"
            cooldown_secs = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(config.launch_mode, LaunchMode::SnapInstant);
        assert_eq!(config.cooldown_secs, 0.25);
        assert_eq!(config.aim_track_speed, AIM_TRACK_SPEED);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = LauncherConfig::from_toml_str("").unwrap();
        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn zero_gravity_in_toml_is_rejected() {
        let err = LauncherConfig::from_toml_str("gravity_y = 0.0").unwrap_err();
        assert_eq!(err, LauncherError::ZeroGravity);
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let err = LauncherConfig::from_toml_str("cooldown_secs = [").unwrap_err();
        assert!(matches!(err, LauncherError::ConfigParse { .. }));
    }

    #[test]
    fn unknown_launch_mode_is_a_parse_error() {
        let err = LauncherConfig::from_toml_str(r#"launch_mode = "teleport""#).unwrap_err();
        assert!(matches!(err, LauncherError::ConfigParse { .. }));
    }

    #[test]
    fn negative_cooldown_is_rejected() {
        let mut config = LauncherConfig::default();
        config.cooldown_secs = -1.0;
        assert!(matches!(
            config.validate(),
            Err(LauncherError::UnsafeConstant {
                name: "FIRE_COOLDOWN_SECS",
                ..
            })
        ));
    }

    #[test]
    fn shipped_asset_matches_compiled_defaults() {
        let shipped = LauncherConfig::from_toml_str(include_str!("../assets/launcher.toml")).unwrap();
        let defaults = LauncherConfig::default();
        assert_eq!(shipped.launch_mode, defaults.launch_mode);
        assert_eq!(shipped.path_resolution, defaults.path_resolution);
        assert!((shipped.gravity_y - defaults.gravity_y).abs() < 1e-6);
        assert!((shipped.apex_height_base - defaults.apex_height_base).abs() < 1e-6);
        assert!((shipped.cooldown_secs - defaults.cooldown_secs).abs() < 1e-6);
    }
}
