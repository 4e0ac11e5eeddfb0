//! Damped spring physics
//!
//! Single-value springs integrated with classic RK4. A spring is a plain
//! value object; the [`AnimationScheduler`](crate::scheduler) steps every
//! registered spring each frame, and owners read the result back from their
//! own thread.
//!
//! Retargeting an in-flight spring keeps its current position and velocity,
//! so interrupted motions blend instead of jumping.

/// Spring parameters: Hooke stiffness, viscous damping, and mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Restoring force per unit of displacement
    pub stiffness: f32,
    /// Velocity-proportional friction
    pub damping: f32,
    /// Inertia; almost always 1.0
    pub mass: f32,
}

impl SpringConfig {
    /// Create a config from raw physics parameters
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Fast, nearly critically damped. Good for UI position snaps.
    pub fn stiff() -> Self {
        Self::new(600.0, 45.0, 1.0)
    }

    /// Slow and soft, settles without overshoot.
    pub fn gentle() -> Self {
        Self::new(120.0, 20.0, 1.0)
    }

    /// Quick with a hint of overshoot.
    pub fn snappy() -> Self {
        Self::new(400.0, 28.0, 1.0)
    }

    /// Pronounced oscillation before settling.
    pub fn wobbly() -> Self {
        Self::new(180.0, 10.0, 1.0)
    }

    /// The sheet motion: stiffness 250, damping 25. Used for both the
    /// open animation and the drag settle-back.
    pub fn sheet() -> Self {
        Self::new(250.0, 25.0, 1.0)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::sheet()
    }
}

/// Displacement below which a spring counts as settled
const POSITION_EPSILON: f32 = 0.01;
/// Speed below which a spring counts as settled
const VELOCITY_EPSILON: f32 = 0.01;

/// A damped spring animating a single scalar toward a target.
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// Create a spring at rest at `initial` (target == value, settled).
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    /// Retarget the spring. Position and velocity are preserved, so an
    /// in-flight motion bends toward the new target instead of restarting.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Override the current velocity (e.g. to hand off gesture momentum).
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    /// Current animated value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current velocity in units per second
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Target the spring is heading toward
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once both displacement and velocity are within epsilon.
    ///
    /// Owners that need an exact resting value snap `value = target()`
    /// when they observe this.
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < POSITION_EPSILON
            && self.velocity.abs() < VELOCITY_EPSILON
    }

    /// Advance by `dt` seconds using RK4 integration.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 || self.is_settled() {
            return;
        }

        // State: (position, velocity). Derivative: (velocity, acceleration).
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        let target = self.target;
        let accel = move |x: f32, v: f32| (-stiffness * (x - target) - damping * v) / mass;

        let (x0, v0) = (self.value, self.velocity);

        let k1x = v0;
        let k1v = accel(x0, v0);

        let k2x = v0 + k1v * dt * 0.5;
        let k2v = accel(x0 + k1x * dt * 0.5, v0 + k1v * dt * 0.5);

        let k3x = v0 + k2v * dt * 0.5;
        let k3v = accel(x0 + k2x * dt * 0.5, v0 + k2v * dt * 0.5);

        let k4x = v0 + k3v * dt;
        let k4v = accel(x0 + k3x * dt, v0 + k3v * dt);

        self.value = x0 + (k1x + 2.0 * k2x + 2.0 * k3x + k4x) * dt / 6.0;
        self.velocity = v0 + (k1v + 2.0 * k2v + 2.0 * k3v + k4v) * dt / 6.0;
    }
}
