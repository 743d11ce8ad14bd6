//! Spring physics animation
//!
//! RK4-integrated spring physics used to interpolate scroll offsets.
//! Supports preset configurations and custom spring parameters.

use serde::Deserialize;

/// Longest single integration step, in seconds
pub const MAX_SUBSTEP: f64 = 1.0 / 120.0;

/// Longest frame a spring will simulate in one `step`; the rest is dropped
pub const MAX_FRAME_DT: f64 = 0.25;

/// Configuration for a spring animation
///
/// The rest thresholds decide when a spring counts as "at rest": both the
/// absolute velocity and the distance to the target must fall below them.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    pub rest_velocity_threshold: f64,
    pub rest_displacement_threshold: f64,
}

impl SpringConfig {
    /// Create a new spring configuration with the scroll rest thresholds
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            ..Self::scroll()
        }
    }

    /// The spring used for smooth scrolling (slightly underdamped)
    pub fn scroll() -> Self {
        Self {
            stiffness: 170.0,
            damping: 26.0,
            mass: 1.0,
            rest_velocity_threshold: 0.01,
            rest_displacement_threshold: 0.1,
        }
    }

    /// A gentle, slow spring
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// A wobbly spring with overshoot
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// A stiff, snappy spring
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// A very stiff spring with minimal oscillation
    pub fn snappy() -> Self {
        Self::new(600.0, 40.0, 1.0)
    }

    /// A slow spring with no overshoot (critically damped)
    pub fn molasses() -> Self {
        Self::new(100.0, 20.0, 1.0)
    }

    /// Override the rest thresholds
    pub fn with_rest_thresholds(mut self, velocity: f64, displacement: f64) -> Self {
        self.rest_velocity_threshold = velocity;
        self.rest_displacement_threshold = displacement;
        self
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is critically damped (no oscillation, fastest settling)
    pub fn is_critically_damped(&self) -> bool {
        (self.damping - self.critical_damping()).abs() < 0.01
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::scroll()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f64) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    /// Create a spring at `from` already heading for `to`
    pub fn between(config: SpringConfig, from: f64, to: f64) -> Self {
        let mut spring = Self::new(config, from);
        spring.set_target(to);
        spring
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Check if the spring is at rest
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.config.rest_displacement_threshold
            && self.velocity.abs() < self.config.rest_velocity_threshold
    }

    /// Step the spring simulation using RK4 integration
    ///
    /// Long frames are split into substeps of at most [`MAX_SUBSTEP`] and
    /// capped at [`MAX_FRAME_DT`], so a stalled frame loop never blows the
    /// integrator up. A settled spring snaps exactly onto its target.
    pub fn step(&mut self, dt: f64) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let substeps = (dt / MAX_SUBSTEP).ceil().max(1.0) as usize;
        let h = dt / substeps as f64;

        for _ in 0..substeps {
            if self.is_settled() {
                break;
            }
            self.integrate(h);
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn integrate(&mut self, dt: f64) {
        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f64, v: f64) -> f64 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}
