//! Undamped simple harmonic motion of a mass on a spring.
//!
//! The mass is fixed at [`UNIT_MASS`] and released from rest at
//! `x = amplitude`, so displacement follows `A·cos(ω·t)` with
//! `ω = sqrt(k/m)`.
//!
//! # Example
//!
//! ```rust
//! use kinematics::{Oscillator, OscillatorParams};
//!
//! let oscillator = Oscillator::new(OscillatorParams::new(1.0, 10.0)).unwrap();
//! let run = oscillator.simulate();
//!
//! assert_eq!(run.samples.len(), 51);
//! assert_eq!(run.samples[0].displacement(), 1.0);
//! assert!((run.period - 1.987).abs() < 1e-3);
//! ```

use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::error::{Result, SimulationError, finite};
use crate::math::{cos, round_to, sqrt};
use crate::sample::TrajectorySample;

/// Mass attached to the spring, kg.
pub const UNIT_MASS: f64 = 1.0;

/// Number of intervals one period is divided into; both ends are sampled,
/// so a run has `OSCILLATOR_STEPS + 1` samples.
pub const OSCILLATOR_STEPS: u32 = 50;

const TIME_PLACES: u32 = 2;
const DISPLACEMENT_PLACES: u32 = 3;

/// Spring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OscillatorParams {
    /// Initial displacement, meters.
    pub amplitude: f64,
    /// Spring stiffness, N/m.
    pub spring_constant: f64,
}

impl OscillatorParams {
    /// Creates spring parameters.
    #[inline]
    pub const fn new(amplitude: f64, spring_constant: f64) -> Self {
        Self {
            amplitude,
            spring_constant,
        }
    }
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self::new(1.0, 10.0)
    }
}

/// Output of [`Oscillator::simulate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OscillatorRun {
    /// Seconds per full oscillation, unrounded.
    pub period: f64,
    /// Angular frequency ω in rad/s, unrounded.
    pub angular_frequency: f64,
    /// One period of displacement samples, time ordered.
    pub samples: Vec<TrajectorySample>,
}

/// A validated spring with its angular frequency precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    params: OscillatorParams,
    omega: f64,
}

impl Oscillator {
    /// Validates `params` and prepares the oscillator.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::NonFinite`] if amplitude or spring constant is NaN/infinite
    /// - [`SimulationError::NonPositiveSpringConstant`] if the spring constant is `<= 0`
    pub fn new(params: OscillatorParams) -> Result<Self> {
        finite("amplitude", params.amplitude)?;
        let k = finite("spring constant", params.spring_constant)?;
        if k <= 0.0 {
            return Err(SimulationError::NonPositiveSpringConstant(k));
        }

        Ok(Self::new_unchecked(params))
    }

    /// Builds an oscillator from parameters already known to be valid.
    pub(crate) fn new_unchecked(params: OscillatorParams) -> Self {
        Self {
            params,
            omega: sqrt(params.spring_constant / UNIT_MASS),
        }
    }

    /// Returns the spring parameters.
    #[inline]
    pub const fn params(&self) -> OscillatorParams {
        self.params
    }

    /// Angular frequency `sqrt(k/m)`.
    #[inline]
    pub const fn angular_frequency(&self) -> f64 {
        self.omega
    }

    /// Period `2π/ω`. Independent of amplitude.
    #[inline]
    pub fn period(&self) -> f64 {
        2.0 * PI / self.omega
    }

    /// Displacement at time `t`, unrounded.
    #[inline]
    pub fn displacement_at(&self, t: f64) -> f64 {
        self.params.amplitude * cos(self.omega * t)
    }

    /// Samples one full period at 51 evenly spaced instants, both ends
    /// included.
    pub fn simulate(&self) -> OscillatorRun {
        let period = self.period();
        let dt = period / f64::from(OSCILLATOR_STEPS);

        let samples = (0..=OSCILLATOR_STEPS)
            .map(|i| {
                let t = f64::from(i) * dt;
                TrajectorySample::oscillator(
                    round_to(t, TIME_PLACES),
                    round_to(self.displacement_at(t), DISPLACEMENT_PLACES),
                )
            })
            .collect();

        OscillatorRun {
            period,
            angular_frequency: self.omega,
            samples,
        }
    }
}

/// Convenience wrapper: validate `params` and run one simulation.
///
/// # Errors
///
/// Same as [`Oscillator::new`].
pub fn simulate_oscillator(params: OscillatorParams) -> Result<OscillatorRun> {
    Ok(Oscillator::new(params)?.simulate())
}
