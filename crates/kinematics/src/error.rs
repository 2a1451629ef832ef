//! Simulation input errors.

use thiserror::Error;

/// Errors returned when simulation parameters fall outside the domain the
/// kernels can evaluate.
///
/// These indicate a programming or input error on the caller's side, so they
/// are surfaced rather than absorbed. An interactive caller typically keeps
/// showing its previous run.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimulationError {
    /// A parameter was NaN or infinite.
    #[error("{parameter} must be a finite number")]
    NonFinite {
        /// Name of the offending parameter.
        parameter: &'static str,
    },

    /// Launch angle outside `[0, 90]` degrees.
    #[error("launch angle {0}° is outside [0, 90]")]
    AngleOutOfDomain(f64),

    /// Negative launch speed.
    #[error("initial speed {0} m/s is negative")]
    NegativeSpeed(f64),

    /// Spring constant of zero or below, which has no period.
    #[error("spring constant {0} N/m must be positive")]
    NonPositiveSpringConstant(f64),
}

/// Result type for simulation operations.
pub type Result<T> = core::result::Result<T, SimulationError>;

/// Returns `value` unchanged, or [`SimulationError::NonFinite`] naming it.
pub(crate) fn finite(parameter: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::NonFinite { parameter })
    }
}
