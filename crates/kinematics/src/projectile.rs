//! Projectile motion over flat ground.
//!
//! The launch point is the origin, height grows upward and gravity pulls
//! down at [`GRAVITY`]. Summary metrics come from closed-form kinematics;
//! the sampled trajectory is a display aid computed alongside them.
//!
//! # Example
//!
//! ```rust
//! use kinematics::{ProjectileMotion, ProjectileParams};
//!
//! let motion = ProjectileMotion::new(ProjectileParams::new(45.0, 20.0)).unwrap();
//! let run = motion.simulate();
//!
//! assert_eq!(run.metrics.time_of_flight, 2.88);
//! assert_eq!(run.metrics.max_height, 10.19);
//! assert_eq!(run.metrics.range, 40.77);
//!
//! for sample in &run.samples {
//!     println!("t={} x={:?} y={}", sample.time, sample.distance(), sample.height());
//! }
//! ```

use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::error::{Result, SimulationError, finite};
use crate::math::{cos, round_to, sin};
use crate::sample::TrajectorySample;

/// Gravitational acceleration in m/s², pulling toward negative height.
pub const GRAVITY: f64 = 9.81;

/// Number of equal time steps `[0, time_of_flight]` is divided into.
///
/// A run has at most `PROJECTILE_STEPS + 1` samples.
pub const PROJECTILE_STEPS: u32 = 50;

/// Decimal places kept in emitted samples and metrics.
const DISPLAY_PLACES: u32 = 2;

/// Launch parameters for a projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileParams {
    /// Launch angle above the horizontal, degrees.
    pub launch_angle_degrees: f64,
    /// Initial speed, m/s.
    pub initial_speed: f64,
}

impl ProjectileParams {
    /// Creates launch parameters.
    #[inline]
    pub const fn new(launch_angle_degrees: f64, initial_speed: f64) -> Self {
        Self {
            launch_angle_degrees,
            initial_speed,
        }
    }
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self::new(45.0, 20.0)
    }
}

/// Summary values of one launch, rounded to two decimals.
///
/// These are computed directly from the launch parameters, not from the
/// sampled trajectory.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedMetrics {
    /// Seconds until the projectile returns to launch height.
    pub time_of_flight: f64,
    /// Peak height above the launch point, meters.
    pub max_height: f64,
    /// Horizontal distance at landing, meters.
    pub range: f64,
}

/// Output of [`ProjectileMotion::simulate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileRun {
    /// Closed-form summary metrics.
    pub metrics: DerivedMetrics,
    /// Sampled trajectory, time ordered.
    pub samples: Vec<TrajectorySample>,
}

/// A validated launch with its trigonometry precomputed.
///
/// Construction is the only fallible step; every method afterwards is a
/// pure evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileMotion {
    params: ProjectileParams,
    sin_theta: f64,
    cos_theta: f64,
    sin_two_theta: f64,
}

impl ProjectileMotion {
    /// Validates `params` and prepares the launch.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::NonFinite`] if the angle or speed is NaN/infinite
    /// - [`SimulationError::AngleOutOfDomain`] if the angle is outside `[0, 90]`
    /// - [`SimulationError::NegativeSpeed`] if the speed is below zero
    pub fn new(params: ProjectileParams) -> Result<Self> {
        let angle = finite("launch angle", params.launch_angle_degrees)?;
        let speed = finite("initial speed", params.initial_speed)?;
        if !(0.0..=90.0).contains(&angle) {
            return Err(SimulationError::AngleOutOfDomain(angle));
        }
        if speed < 0.0 {
            return Err(SimulationError::NegativeSpeed(speed));
        }

        let theta = angle * PI / 180.0;
        Ok(Self {
            params,
            sin_theta: sin(theta),
            cos_theta: cos(theta),
            sin_two_theta: sin(2.0 * theta),
        })
    }

    /// Returns the launch parameters.
    #[inline]
    pub const fn params(&self) -> ProjectileParams {
        self.params
    }

    /// `2·v·sin(θ)/g`, unrounded.
    #[inline]
    pub fn time_of_flight(&self) -> f64 {
        2.0 * self.params.initial_speed * self.sin_theta / GRAVITY
    }

    /// `(v·sin θ)²/(2g)`, unrounded.
    #[inline]
    pub fn max_height(&self) -> f64 {
        let vertical = self.params.initial_speed * self.sin_theta;
        vertical * vertical / (2.0 * GRAVITY)
    }

    /// `v²·sin(2θ)/g`, unrounded.
    #[inline]
    pub fn range(&self) -> f64 {
        let v = self.params.initial_speed;
        v * v * self.sin_two_theta / GRAVITY
    }

    /// Height at time `t`, unrounded. Negative once the projectile has
    /// passed below launch height.
    #[inline]
    pub fn height_at(&self, t: f64) -> f64 {
        self.params.initial_speed * self.sin_theta * t - 0.5 * GRAVITY * (t * t)
    }

    /// Horizontal distance at time `t`, unrounded.
    #[inline]
    pub fn distance_at(&self, t: f64) -> f64 {
        self.params.initial_speed * self.cos_theta * t
    }

    /// Time between consecutive samples.
    #[inline]
    pub fn time_step(&self) -> f64 {
        self.time_of_flight() / f64::from(PROJECTILE_STEPS)
    }

    /// Closed-form metrics rounded for display.
    pub fn metrics(&self) -> DerivedMetrics {
        DerivedMetrics {
            time_of_flight: round_to(self.time_of_flight(), DISPLAY_PLACES),
            max_height: round_to(self.max_height(), DISPLAY_PLACES),
            range: round_to(self.range(), DISPLAY_PLACES),
        }
    }

    /// Samples the trajectory over `[0, time_of_flight]`.
    ///
    /// Time starts at zero and advances by adding `time_of_flight/50` each
    /// step while it stays at or below `time_of_flight`. The accumulated
    /// time usually overshoots `time_of_flight` by a rounding error on the
    /// last step, so most runs end one step short of landing. Emission also
    /// stops at the first step whose height is negative; that step is
    /// dropped rather than clamped to the ground. A horizontal launch has
    /// zero flight time and yields only the `t = 0` sample.
    pub fn simulate(&self) -> ProjectileRun {
        ProjectileRun {
            metrics: self.metrics(),
            samples: self.samples(),
        }
    }

    fn samples(&self) -> Vec<TrajectorySample> {
        let flight = self.time_of_flight();
        let step = self.time_step();
        if step <= 0.0 {
            return alloc::vec![TrajectorySample::projectile(0.0, 0.0, 0.0)];
        }

        let mut samples = Vec::with_capacity(PROJECTILE_STEPS as usize + 1);
        let mut t = 0.0;
        // Accumulated time passes `flight` within one step of the last one.
        for _ in 0..=PROJECTILE_STEPS + 1 {
            if t > flight {
                break;
            }
            let y = self.height_at(t);
            if y < 0.0 {
                break;
            }
            samples.push(TrajectorySample::projectile(
                round_to(t, DISPLAY_PLACES),
                round_to(y, DISPLAY_PLACES),
                round_to(self.distance_at(t), DISPLAY_PLACES),
            ));
            t += step;
        }
        samples
    }
}

/// Convenience wrapper: validate `params` and run one simulation.
///
/// # Errors
///
/// Same as [`ProjectileMotion::new`].
pub fn simulate_projectile(params: ProjectileParams) -> Result<ProjectileRun> {
    Ok(ProjectileMotion::new(params)?.simulate())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn motion(angle: f64, speed: f64) -> ProjectileMotion {
        ProjectileMotion::new(ProjectileParams::new(angle, speed)).unwrap()
    }

    #[test]
    fn test_reference_launch_metrics() {
        let m = motion(45.0, 20.0).metrics();
        assert_eq!(m.time_of_flight, 2.88);
        assert_eq!(m.max_height, 10.19);
        assert_eq!(m.range, 40.77);
    }

    #[test]
    fn test_unrounded_metrics() {
        let m = motion(30.0, 10.0);
        assert!(approx_eq(m.time_of_flight(), 10.0 / GRAVITY));
        assert!(approx_eq(m.max_height(), 25.0 / (2.0 * GRAVITY)));
        assert!(approx_eq(
            m.range(),
            100.0 * (60.0f64.to_radians()).sin() / GRAVITY
        ));
    }

    #[test]
    fn test_first_sample_is_origin() {
        let run = motion(60.0, 25.0).simulate();
        let first = run.samples[0];
        assert_eq!(first.time, 0.0);
        assert_eq!(first.height(), 0.0);
        assert_eq!(first.distance(), Some(0.0));
    }

    #[test]
    fn test_sample_count_bounded() {
        for angle in [1.0, 15.0, 45.0, 75.0, 90.0] {
            let run = motion(angle, 50.0).simulate();
            assert!(run.samples.len() <= PROJECTILE_STEPS as usize + 1);
            assert!(run.samples.len() >= PROJECTILE_STEPS as usize);
        }
    }

    #[test]
    fn test_samples_are_time_ordered() {
        let run = motion(35.0, 18.0).simulate();
        for pair in run.samples.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
    }

    #[test]
    fn test_heights_never_negative() {
        let run = motion(80.0, 42.0).simulate();
        assert!(run.samples.iter().all(|s| s.height() >= 0.0));
    }

    #[test]
    fn test_landing_step_is_dropped_by_time_guard() {
        // 50 additions of the step overshoot the flight time, so the
        // ground-level sample at t = 2.88 never appears.
        let run = motion(45.0, 20.0).simulate();
        assert_eq!(run.samples.len(), 50);
        assert_eq!(
            run.samples[49],
            TrajectorySample::projectile(2.83, 0.8, 39.96)
        );
    }

    #[test]
    fn test_landing_step_kept_when_time_stays_inside_flight() {
        let run = motion(30.0, 10.0).simulate();
        assert_eq!(run.samples.len(), 51);
        let last = run.samples[50];
        assert_eq!(last.time, 1.02);
        assert_eq!(last.height(), 0.0);
        assert_eq!(last.distance(), Some(8.83));
    }

    #[test]
    fn test_horizontal_launch_yields_single_sample() {
        let run = motion(0.0, 30.0).simulate();
        assert_eq!(run.samples.len(), 1);
        assert_eq!(run.samples[0], TrajectorySample::projectile(0.0, 0.0, 0.0));
        assert_eq!(run.metrics, DerivedMetrics::default());
    }

    #[test]
    fn test_vertical_launch_has_no_range() {
        let m = motion(90.0, 20.0);
        assert_eq!(m.metrics().range, 0.0);
        let run = m.simulate();
        assert!(run.samples.iter().all(|s| s.distance() == Some(0.0)));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert_eq!(
            ProjectileMotion::new(ProjectileParams::new(f64::NAN, 10.0)),
            Err(SimulationError::NonFinite {
                parameter: "launch angle"
            })
        );
        assert_eq!(
            ProjectileMotion::new(ProjectileParams::new(91.0, 10.0)),
            Err(SimulationError::AngleOutOfDomain(91.0))
        );
        assert_eq!(
            ProjectileMotion::new(ProjectileParams::new(-1.0, 10.0)),
            Err(SimulationError::AngleOutOfDomain(-1.0))
        );
        assert_eq!(
            ProjectileMotion::new(ProjectileParams::new(45.0, -3.0)),
            Err(SimulationError::NegativeSpeed(-3.0))
        );
        assert!(ProjectileMotion::new(ProjectileParams::new(45.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_simulate_projectile_wrapper() {
        let run = simulate_projectile(ProjectileParams::default()).unwrap();
        assert_eq!(run, motion(45.0, 20.0).simulate());
    }
}
