//! Centralised launcher and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Each constant includes the tested range and the observable consequence of
//! changing it.  Every value can also be overridden at runtime through
//! `assets/launcher.toml` (see [`crate::config::LauncherConfig`]).

// ── World ─────────────────────────────────────────────────────────────────────

/// Signed vertical acceleration (u/s²).  Negative pulls toward −Y.
///
/// Shared by the arc predictor and Rapier so the drawn path and the real
/// flight agree.  Positive values produce an inverted world; zero is rejected
/// at startup.
pub const GRAVITY_Y: f32 = -9.81;

// ── Aim Tracking ──────────────────────────────────────────────────────────────

/// Speed (u/s) at which the aim point walks toward the cached raycast hit in
/// `TrackRaycast` mode.
///
/// Tested range: 2.0–15.0.  At 5.0 a target 20 u away is reached after 4 s of charge.
pub const AIM_TRACK_SPEED: f32 = 5.0;

/// Growth rate (u/s²) of the per-tick forward step in `FollowForwardGroundSnap` mode.
///
/// The step itself grows linearly, so the travelled distance grows quadratically
/// with charge time.  Values above ~0.05 make the reticle race off-screen.
pub const FORWARD_GROWTH_RATE: f32 = 0.01;

/// Minimum height (u) above the aim point from which the ground-snap ray starts.
///
/// Values below 2.0 stop the reticle from climbing onto higher ledges in front of it.
pub const GROUND_SNAP_MIN_OFFSET: f32 = 2.0;

/// Extra ground-snap ray height (u) per unit of downward camera pitch.
///
/// Looking straight down (`forward.y = −1`) lifts the ray origin by this much,
/// which keeps the reticle from tunnelling under steep slopes.
pub const GROUND_SNAP_PITCH_SCALE: f32 = 20.0;

/// Maximum length (u) of every aim ray cast into the world.
pub const AIM_RAY_MAX_DISTANCE: f32 = 1000.0;

// ── Arc Shaping ───────────────────────────────────────────────────────────────

/// Apex height (u above the launch point) at the start of every charge.
pub const APEX_HEIGHT_BASE: f32 = 25.0;

/// Apex height gained per second of charge (u/s).
///
/// Small on purpose: holding the button adds loft, not a different arc family.
pub const APEX_GROWTH_RATE: f32 = 0.2;

/// Floor for the apex height (u).
///
/// A zero or negative apex would need the square root of a negative number in
/// the ascent-time formula; this floor keeps every solve real and finite.
pub const MIN_APEX_HEIGHT: f32 = 0.01;

// ── Firing ────────────────────────────────────────────────────────────────────

/// Seconds after a shot before a new charge may begin.
pub const FIRE_COOLDOWN_SECS: f32 = 1.0;

/// Number of segments in the predicted path polyline (vertices = resolution + 1).
pub const PATH_RESOLUTION: usize = 20;

// ── Projectile ────────────────────────────────────────────────────────────────

/// Seconds before a launched projectile is despawned.
pub const PROJECTILE_LIFETIME: f32 = 3.0;

/// Radius (u) of the projectile ball collider.
pub const PROJECTILE_RADIUS: f32 = 0.25;
