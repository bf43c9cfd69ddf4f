//! Charge / fire state machine.
//!
//! ## States
//!
//! | State | Fire input handling | Leaves when |
//! |-------|---------------------|-------------|
//! | `Idle` | `Down` starts a charge; everything else ignored | fire pressed |
//! | `Charging` | `Held` advances aim + apex and re-solves; `Up` fires | fire released |
//! | `Cooling` | all input ignored | `cooldown_secs` have elapsed |
//!
//! The host calls [`ChargeFireController::tick`] once per simulation step in
//! every state, so the cooldown runs down even when no input arrives.  There
//! is no abort: releasing the button always fires.

use bevy::prelude::*;

use super::aim::{AimTargetTracker, AimTuning, AimView, EnvironmentQuery, LaunchMode};
use super::path::sample_path;
use super::trajectory::{solve, GravityField, LaunchSolution};
use crate::config::LauncherConfig;
use crate::error::LauncherResult;

/// Where the controller is in its charge → fire → cooldown cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeState {
    #[default]
    Idle,
    Charging,
    Cooling,
}

/// Fire-button edge/level observed this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FireInput {
    /// Button up and not just released.
    #[default]
    None,
    /// Pressed this tick.
    Down,
    /// Still pressed from an earlier tick.
    Held,
    /// Released this tick.
    Up,
}

/// Creates projectiles and hands them their launch velocity.
///
/// Called exactly once per fire transition.
pub trait ProjectileSpawner {
    type Handle;

    /// Create a projectile at the given pose.
    fn spawn(&mut self, position: Vec3, orientation: Quat) -> Self::Handle;

    /// Where the spawned projectile actually starts its flight.
    fn launch_origin(&self, projectile: &Self::Handle) -> Vec3;

    /// Give the projectile its initial velocity; the physics engine integrates from there.
    fn set_initial_velocity(&mut self, projectile: &Self::Handle, velocity: Vec3);
}

/// Everything outside the controller that one tick reads or drives.
pub struct TickContext<'a, E, S> {
    /// Launcher pose; its translation is also the aim reset point.
    pub launcher: &'a Transform,
    /// Camera look ray used by the raycast aim modes.
    pub camera_ray: Ray3d,
    pub environment: &'a E,
    pub spawner: &'a mut S,
}

/// What a tick produced for the outside world.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickOutput {
    /// Freshly sampled predicted path, emitted while charging and on fire.
    pub path: Option<Vec<Vec3>>,
    /// Solution applied to the projectile spawned this tick.
    pub fired: Option<LaunchSolution>,
    /// Cooldown ran out this tick and the controller is back to `Idle`.
    pub cooldown_finished: bool,
}

/// Owns the aim point, charge accumulators and cooldown timer for one launcher.
#[derive(Debug, Clone)]
pub struct ChargeFireController {
    state: ChargeState,
    mode: LaunchMode,
    gravity: GravityField,
    aim_tuning: AimTuning,
    tracker: AimTargetTracker,
    apex_height_base: f32,
    apex_growth_rate: f32,
    cooldown_secs: f32,
    path_resolution: usize,
    apex_height: f32,
    charge_elapsed: f32,
    cooldown_elapsed: f32,
}

impl ChargeFireController {
    /// Build a controller from validated configuration, aiming at `origin`.
    ///
    /// Fails fast on configuration the solver cannot handle (zero gravity,
    /// negative cooldown, empty path).
    pub fn new(config: &LauncherConfig, origin: Vec3) -> LauncherResult<Self> {
        config.validate()?;
        Ok(Self {
            state: ChargeState::Idle,
            mode: config.launch_mode,
            gravity: GravityField::new(config.gravity_y)?,
            aim_tuning: AimTuning::from(config),
            tracker: AimTargetTracker::new(origin),
            apex_height_base: config.apex_height_base,
            apex_growth_rate: config.apex_growth_rate,
            cooldown_secs: config.cooldown_secs,
            path_resolution: config.path_resolution,
            apex_height: config.apex_height_base,
            charge_elapsed: 0.0,
            cooldown_elapsed: 0.0,
        })
    }

    #[inline]
    pub fn state(&self) -> ChargeState {
        self.state
    }

    #[inline]
    pub fn launch_mode(&self) -> LaunchMode {
        self.mode
    }

    /// Switch aim behaviour.  Takes effect on the next tick.
    pub fn set_launch_mode(&mut self, mode: LaunchMode) {
        self.mode = mode;
    }

    #[inline]
    pub fn gravity(&self) -> GravityField {
        self.gravity
    }

    /// Current predicted landing point.
    #[inline]
    pub fn aim_point(&self) -> Vec3 {
        self.tracker.position()
    }

    #[inline]
    pub fn tracker(&self) -> &AimTargetTracker {
        &self.tracker
    }

    /// Apex height the next solve will start from.
    #[inline]
    pub fn apex_height(&self) -> f32 {
        self.apex_height
    }

    /// Seconds the current (or last) charge has been held.
    #[inline]
    pub fn charge_elapsed(&self) -> f32 {
        self.charge_elapsed
    }

    /// Seconds left before a new charge may start; zero outside `Cooling`.
    pub fn cooldown_remaining(&self) -> f32 {
        match self.state {
            ChargeState::Cooling => (self.cooldown_secs - self.cooldown_elapsed).max(0.0),
            _ => 0.0,
        }
    }

    /// Advance the controller by `dt` seconds.
    ///
    /// The cooldown timer is advanced before input is considered, so a press
    /// on the tick the cooldown expires starts a new charge.
    pub fn tick<E, S>(
        &mut self,
        input: FireInput,
        dt: f32,
        ctx: TickContext<'_, E, S>,
    ) -> TickOutput
    where
        E: EnvironmentQuery,
        S: ProjectileSpawner,
    {
        let mut output = TickOutput::default();

        if self.state == ChargeState::Cooling {
            self.cooldown_elapsed += dt;
            if self.cooldown_elapsed >= self.cooldown_secs {
                self.state = ChargeState::Idle;
                self.tracker.reset_to(ctx.launcher.translation);
                output.cooldown_finished = true;
                debug!("Launcher ready");
            }
        }

        match (self.state, input) {
            (ChargeState::Idle, FireInput::Down) => {
                self.begin_charge();
                output.path = Some(self.charge_step(dt, &ctx));
            }
            (ChargeState::Charging, FireInput::Held) => {
                output.path = Some(self.charge_step(dt, &ctx));
            }
            (ChargeState::Charging, FireInput::Up) => {
                let (solution, path) = self.fire(ctx);
                output.fired = Some(solution);
                output.path = Some(path);
            }
            _ => {}
        }

        output
    }

    fn begin_charge(&mut self) {
        self.state = ChargeState::Charging;
        self.tracker.begin_charge();
        self.apex_height = self.apex_height_base;
        self.charge_elapsed = 0.0;
        debug!("Charging ({:?})", self.mode);
    }

    fn charge_step<E, S>(&mut self, dt: f32, ctx: &TickContext<'_, E, S>) -> Vec<Vec3>
    where
        E: EnvironmentQuery,
    {
        self.charge_elapsed += dt;

        let view = AimView {
            camera_ray: ctx.camera_ray,
            launcher_forward: ctx.launcher.forward(),
        };
        let target = self
            .tracker
            .advance(self.mode, &view, dt, ctx.environment, &self.aim_tuning);

        self.apex_height += self.apex_growth_rate * dt;

        let origin = ctx.launcher.translation;
        let solution = solve(origin, target, self.apex_height, self.gravity);
        self.apex_height = solution.apex_height;
        sample_path(origin, &solution, self.gravity, self.path_resolution)
    }

    fn fire<E, S>(&mut self, ctx: TickContext<'_, E, S>) -> (LaunchSolution, Vec<Vec3>)
    where
        S: ProjectileSpawner,
    {
        let projectile = ctx
            .spawner
            .spawn(ctx.launcher.translation, ctx.launcher.rotation);
        // Solve from where the projectile really starts, not the launcher.
        let origin = ctx.spawner.launch_origin(&projectile);
        let solution = solve(origin, self.tracker.position(), self.apex_height, self.gravity);
        self.apex_height = solution.apex_height;
        ctx.spawner
            .set_initial_velocity(&projectile, solution.initial_velocity);

        self.state = ChargeState::Cooling;
        self.cooldown_elapsed = 0.0;
        debug!(
            "Fired after {:.2}s charge: v = {:?}, flight {:.2}s",
            self.charge_elapsed, solution.initial_velocity, solution.time_to_target
        );

        let path = sample_path(origin, &solution, self.gravity, self.path_resolution);
        (solution, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LauncherError;

    /// Records every spawn; projectiles start `muzzle` away from the requested position.
    #[derive(Default)]
    struct RecordingSpawner {
        muzzle: Vec3,
        spawned: Vec<(Vec3, Quat)>,
        velocities: Vec<Vec3>,
    }

    impl ProjectileSpawner for RecordingSpawner {
        type Handle = usize;

        fn spawn(&mut self, position: Vec3, orientation: Quat) -> usize {
            self.spawned.push((position, orientation));
            self.spawned.len() - 1
        }

        fn launch_origin(&self, projectile: &usize) -> Vec3 {
            self.spawned[*projectile].0 + self.muzzle
        }

        fn set_initial_velocity(&mut self, _projectile: &usize, velocity: Vec3) {
            self.velocities.push(velocity);
        }
    }

    fn ground(origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Vec3> {
        if direction.y >= 0.0 {
            return None;
        }
        let t = -origin.y / direction.y;
        (t >= 0.0 && t <= max_distance).then(|| origin + *direction * t)
    }

    struct Rig {
        controller: ChargeFireController,
        launcher: Transform,
        spawner: RecordingSpawner,
    }

    impl Rig {
        fn new(config: LauncherConfig) -> Self {
            let launcher = Transform::from_xyz(0.0, 1.0, 0.0);
            Self {
                controller: ChargeFireController::new(&config, launcher.translation).unwrap(),
                launcher,
                spawner: RecordingSpawner::default(),
            }
        }

        fn tick(&mut self, input: FireInput, dt: f32) -> TickOutput {
            let camera_ray = Ray3d::new(
                Vec3::new(0.0, 10.0, 0.0),
                Dir3::new(Vec3::new(0.0, -1.0, -1.0)).unwrap(),
            );
            self.controller.tick(
                input,
                dt,
                TickContext {
                    launcher: &self.launcher,
                    camera_ray,
                    environment: &ground,
                    spawner: &mut self.spawner,
                },
            )
        }
    }

    fn rig() -> Rig {
        Rig::new(LauncherConfig::default())
    }

    #[test]
    fn new_rejects_zero_gravity() {
        let config = LauncherConfig {
            gravity_y: 0.0,
            ..Default::default()
        };
        let err = ChargeFireController::new(&config, Vec3::ZERO).unwrap_err();
        assert_eq!(err, LauncherError::ZeroGravity);
    }

    #[test]
    fn idle_ignores_everything_but_down() {
        let mut rig = rig();
        for input in [FireInput::None, FireInput::Held, FireInput::Up] {
            let out = rig.tick(input, 0.1);
            assert_eq!(rig.controller.state(), ChargeState::Idle, "{input:?}");
            assert_eq!(out, TickOutput::default());
        }
        assert!(rig.spawner.spawned.is_empty());

        rig.tick(FireInput::Down, 0.1);
        assert_eq!(rig.controller.state(), ChargeState::Charging);
    }

    #[test]
    fn charging_emits_a_path_every_held_tick_without_firing() {
        let mut rig = rig();
        let out = rig.tick(FireInput::Down, 0.1);
        assert_eq!(out.path.as_ref().map(Vec::len), Some(21));

        for _ in 0..5 {
            let out = rig.tick(FireInput::Held, 0.1);
            assert_eq!(out.path.as_ref().map(Vec::len), Some(21));
            assert!(out.fired.is_none());
        }
        assert!(rig.spawner.spawned.is_empty());
        assert_eq!(rig.controller.state(), ChargeState::Charging);
    }

    #[test]
    fn charging_ignores_none_and_repeated_down() {
        let mut rig = rig();
        rig.tick(FireInput::Down, 0.1);
        let aim = rig.controller.aim_point();
        let apex = rig.controller.apex_height();

        for input in [FireInput::None, FireInput::Down] {
            let out = rig.tick(input, 0.1);
            assert_eq!(out, TickOutput::default(), "{input:?}");
            assert_eq!(rig.controller.state(), ChargeState::Charging);
        }
        assert_eq!(rig.controller.aim_point(), aim);
        assert_eq!(rig.controller.apex_height(), apex);
    }

    #[test]
    fn apex_grows_while_held_and_resets_on_next_charge() {
        let config = LauncherConfig::default();
        let mut rig = Rig::new(config.clone());
        rig.tick(FireInput::Down, 0.5);
        rig.tick(FireInput::Held, 0.5);
        let grown = config.apex_height_base + config.apex_growth_rate * 1.0;
        assert!((rig.controller.apex_height() - grown).abs() < 1e-5);

        rig.tick(FireInput::Up, 0.0);
        rig.tick(FireInput::None, config.cooldown_secs);
        assert_eq!(rig.controller.state(), ChargeState::Idle);

        rig.tick(FireInput::Down, 0.0);
        assert_eq!(rig.controller.apex_height(), config.apex_height_base);
    }

    #[test]
    fn release_fires_once_and_enters_cooling() {
        let mut rig = rig();
        rig.tick(FireInput::Down, 0.1);
        rig.tick(FireInput::Held, 0.1);
        let out = rig.tick(FireInput::Up, 0.1);

        let solution = out.fired.expect("release must fire");
        assert_eq!(rig.spawner.spawned.len(), 1);
        assert_eq!(rig.spawner.velocities, vec![solution.initial_velocity]);
        assert_eq!(rig.spawner.spawned[0].0, rig.launcher.translation);
        assert_eq!(out.path.as_ref().map(Vec::len), Some(21));
        assert_eq!(rig.controller.state(), ChargeState::Cooling);
    }

    #[test]
    fn fire_solves_from_the_projectile_start_not_the_launcher() {
        let mut rig = rig();
        rig.spawner.muzzle = Vec3::new(0.0, 0.5, -1.0);
        rig.tick(FireInput::Down, 0.2);
        let target = rig.controller.aim_point();
        let out = rig.tick(FireInput::Up, 0.0);

        let path = out.path.unwrap();
        let muzzle = rig.launcher.translation + rig.spawner.muzzle;
        assert_eq!(path[0], muzzle);
        let landing = path[path.len() - 1];
        assert!((landing - target).length() < 1e-3, "landed at {landing:?}");
    }

    #[test]
    fn zero_length_charge_still_fires_a_valid_arc() {
        let mut rig = rig();
        rig.tick(FireInput::Down, 0.0);
        let out = rig.tick(FireInput::Up, 0.0);
        let solution = out.fired.unwrap();
        assert!(solution.initial_velocity.is_finite());
        assert!(solution.time_to_target > 0.0);
        assert_eq!(rig.controller.state(), ChargeState::Cooling);
    }

    #[test]
    fn cooling_ignores_input_then_returns_to_idle_at_launcher() {
        let mut rig = rig();
        let dt = 0.125;
        let mut now = 0.0;

        rig.tick(FireInput::Down, dt);
        now += dt;
        while now < 0.5 {
            rig.tick(FireInput::Held, dt);
            now += dt;
        }
        rig.tick(FireInput::Up, dt);
        assert_eq!(rig.controller.state(), ChargeState::Cooling);
        assert_ne!(rig.controller.aim_point(), rig.launcher.translation);

        // t = 0.5 .. 1.5: every input is a no-op, including a press at t = 1.0.
        let inputs = [FireInput::Down, FireInput::Held, FireInput::Up, FireInput::None];
        for step in 1..8 {
            let t = 0.5 + step as f32 * dt;
            let input = if (t - 1.0).abs() < 1e-6 {
                FireInput::Down
            } else {
                inputs[step % inputs.len()]
            };
            let out = rig.tick(input, dt);
            assert_eq!(rig.controller.state(), ChargeState::Cooling, "t = {t}");
            assert!(out.fired.is_none() && out.path.is_none());
        }
        assert_eq!(rig.spawner.spawned.len(), 1);

        // t = 1.5: cooldown elapses.
        let out = rig.tick(FireInput::None, dt);
        assert!(out.cooldown_finished);
        assert_eq!(rig.controller.state(), ChargeState::Idle);
        assert_eq!(rig.controller.aim_point(), rig.launcher.translation);
        assert_eq!(rig.controller.cooldown_remaining(), 0.0);
    }

    #[test]
    fn press_on_the_tick_cooldown_expires_starts_a_charge() {
        let mut rig = rig();
        rig.tick(FireInput::Down, 0.0);
        rig.tick(FireInput::Up, 0.0);
        let out = rig.tick(FireInput::Down, 1.0);
        assert!(out.cooldown_finished);
        assert_eq!(rig.controller.state(), ChargeState::Charging);
    }

    #[test]
    fn snap_instant_fires_at_camera_hit() {
        let config = LauncherConfig {
            launch_mode: LaunchMode::SnapInstant,
            ..Default::default()
        };
        let mut rig = Rig::new(config);
        rig.tick(FireInput::Down, 0.016);
        let out = rig.tick(FireInput::Up, 0.016);
        let path = out.path.unwrap();
        let landing = path[path.len() - 1];
        assert!((landing - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-3);
    }

    #[test]
    fn cooldown_remaining_counts_down() {
        let mut rig = rig();
        rig.tick(FireInput::Down, 0.0);
        rig.tick(FireInput::Up, 0.0);
        assert_eq!(rig.controller.cooldown_remaining(), 1.0);
        rig.tick(FireInput::None, 0.25);
        assert!((rig.controller.cooldown_remaining() - 0.75).abs() < 1e-6);
    }
}
