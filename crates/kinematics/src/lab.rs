//! Interactive front ends for the kernels.
//!
//! The two labs differ in when they recompute:
//!
//! - [`OscillatorLab`] is live. Every parameter change reruns the
//!   simulation before the setter returns.
//! - [`ProjectileLab`] is on demand. Setters only record the new value;
//!   nothing is computed until [`ProjectileLab::launch`].
//!
//! Both clamp incoming values into the interactive ranges, which is the
//! caller-side half of the kernels' contract. A value the kernel still
//! rejects (NaN) leaves the previous run in place.

use crate::error::Result;
use crate::oscillator::{Oscillator, OscillatorParams, OscillatorRun};
use crate::projectile::{ProjectileMotion, ProjectileParams, ProjectileRun};
use crate::sample::{AMPLITUDE_RANGE, ANGLE_RANGE, SPEED_RANGE, SPRING_CONSTANT_RANGE};

/// When a lab reruns its simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputePolicy {
    /// Recompute on every parameter change.
    OnChange,
    /// Recompute only on an explicit trigger.
    OnDemand,
}

/// Live simple harmonic motion lab.
///
/// # Example
///
/// ```rust
/// use kinematics::OscillatorLab;
///
/// let mut lab = OscillatorLab::new();
/// let before = lab.run().period;
///
/// lab.set_spring_constant(40.0).unwrap();
/// assert!(lab.run().period < before);
/// ```
#[derive(Debug, Clone)]
pub struct OscillatorLab {
    params: OscillatorParams,
    run: OscillatorRun,
}

impl OscillatorLab {
    /// Recompute behavior of this lab.
    pub const POLICY: RecomputePolicy = RecomputePolicy::OnChange;

    /// Creates a lab at the default parameters (1 m, 10 N/m), already run.
    pub fn new() -> Self {
        let params = OscillatorParams::default();
        let run = Oscillator::new_unchecked(params).simulate();
        Self { params, run }
    }

    /// Current parameters.
    pub const fn params(&self) -> OscillatorParams {
        self.params
    }

    /// Latest run. Always reflects the current parameters.
    pub const fn run(&self) -> &OscillatorRun {
        &self.run
    }

    /// Sets the amplitude (clamped to 0.1–5.0 m) and recomputes.
    ///
    /// # Errors
    ///
    /// Returns the kernel's error for a non-finite value; the previous run
    /// and parameters are kept.
    pub fn set_amplitude(&mut self, amplitude: f64) -> Result<&OscillatorRun> {
        let params = OscillatorParams {
            amplitude: AMPLITUDE_RANGE.clamp(amplitude),
            ..self.params
        };
        self.recompute(params)
    }

    /// Sets the spring constant (clamped to 5–100 N/m) and recomputes.
    ///
    /// # Errors
    ///
    /// Returns the kernel's error for a non-finite value; the previous run
    /// and parameters are kept.
    pub fn set_spring_constant(&mut self, spring_constant: f64) -> Result<&OscillatorRun> {
        let params = OscillatorParams {
            spring_constant: SPRING_CONSTANT_RANGE.clamp(spring_constant),
            ..self.params
        };
        self.recompute(params)
    }

    fn recompute(&mut self, params: OscillatorParams) -> Result<&OscillatorRun> {
        let run = Oscillator::new(params)?.simulate();
        self.params = params;
        self.run = run;
        Ok(&self.run)
    }
}

impl Default for OscillatorLab {
    fn default() -> Self {
        Self::new()
    }
}

/// On-demand projectile lab.
///
/// # Example
///
/// ```rust
/// use kinematics::ProjectileLab;
///
/// let mut lab = ProjectileLab::new();
/// lab.set_angle(30.0);
/// lab.set_speed(25.0);
/// assert!(lab.run().is_none());
///
/// let run = lab.launch().unwrap();
/// assert!(run.metrics.range > 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectileLab {
    params: ProjectileParams,
    run: Option<ProjectileRun>,
}

impl ProjectileLab {
    /// Recompute behavior of this lab.
    pub const POLICY: RecomputePolicy = RecomputePolicy::OnDemand;

    /// Creates a lab at the default parameters (45°, 20 m/s) with no run yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending parameters for the next launch.
    pub const fn params(&self) -> ProjectileParams {
        self.params
    }

    /// Result of the most recent launch, if any.
    ///
    /// This can be stale with respect to [`params`](Self::params) until the
    /// next launch.
    pub const fn run(&self) -> Option<&ProjectileRun> {
        self.run.as_ref()
    }

    /// Records a new launch angle, clamped to 0–90°. Does not recompute.
    pub fn set_angle(&mut self, degrees: f64) {
        self.params.launch_angle_degrees = ANGLE_RANGE.clamp(degrees);
    }

    /// Records a new launch speed, clamped to 5–50 m/s. Does not recompute.
    pub fn set_speed(&mut self, speed: f64) {
        self.params.initial_speed = SPEED_RANGE.clamp(speed);
    }

    /// Runs the simulation for the pending parameters.
    ///
    /// # Errors
    ///
    /// Returns the kernel's error when a pending value is non-finite. The
    /// previous run is kept.
    pub fn launch(&mut self) -> Result<&ProjectileRun> {
        let run = ProjectileMotion::new(self.params)?.simulate();
        Ok(&*self.run.insert(run))
    }
}
