#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

//! # Kinematics
//!
//! Closed-form kinematics kernels for an interactive physics lab.
//!
//! Kinematics provides:
//! - **Projectile**: launch metrics and a sampled trajectory over flat ground
//! - **Oscillator**: one period of undamped simple harmonic motion
//! - **Labs**: interactive wrappers with live or on-demand recompute
//!
//! Every kernel is a pure function of its parameters. Calling it twice with
//! the same input yields the same output, and it is safe to call from any
//! number of threads.
//!
//! ## Projectile Example
//!
//! ```rust
//! use kinematics::{simulate_projectile, ProjectileParams};
//!
//! let run = simulate_projectile(ProjectileParams::new(45.0, 20.0)).unwrap();
//!
//! assert_eq!(run.metrics.range, 40.77);
//! assert!(run.samples.len() <= 51);
//! ```
//!
//! ## Oscillator Example
//!
//! ```rust
//! use kinematics::{simulate_oscillator, OscillatorParams};
//!
//! let run = simulate_oscillator(OscillatorParams::new(2.0, 25.0)).unwrap();
//!
//! assert_eq!(run.samples[0].displacement(), 2.0);
//! assert_eq!(run.samples[25].displacement(), -2.0);
//! ```
//!
//! ## Rounding
//!
//! Emitted samples and projectile metrics are rounded for display (two
//! decimals, three for oscillator displacement). The unrounded kernels are
//! available as methods on [`ProjectileMotion`] and [`Oscillator`]; use
//! those for further computation.

extern crate alloc;

mod error;
mod lab;
mod math;
mod oscillator;
mod projectile;
mod sample;

pub use error::{Result, SimulationError};
pub use lab::{OscillatorLab, ProjectileLab, RecomputePolicy};
pub use math::round_to;
pub use oscillator::{
    OSCILLATOR_STEPS, Oscillator, OscillatorParams, OscillatorRun, UNIT_MASS, simulate_oscillator,
};
pub use projectile::{
    DerivedMetrics, GRAVITY, PROJECTILE_STEPS, ProjectileMotion, ProjectileParams, ProjectileRun,
    simulate_projectile,
};
pub use sample::{
    AMPLITUDE_RANGE, ANGLE_RANGE, ParamRange, SPEED_RANGE, SPRING_CONSTANT_RANGE,
    TrajectorySample,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::lab::{OscillatorLab, ProjectileLab, RecomputePolicy};
    pub use crate::oscillator::{Oscillator, OscillatorParams, OscillatorRun};
    pub use crate::projectile::{DerivedMetrics, ProjectileMotion, ProjectileParams, ProjectileRun};
    pub use crate::sample::TrajectorySample;
}
