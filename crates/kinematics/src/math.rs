//! Numeric helpers shared by the projectile and oscillator kernels.
//!
//! The trigonometric wrappers work in both std and no_std builds; without
//! `std` they route through `libm`.

/// Rounds `value` to `places` decimal digits, half away from zero.
///
/// This is a display rounding. Feeding its output back into further
/// computation accumulates error.
///
/// # Example
///
/// ```rust
/// use kinematics::round_to;
///
/// assert_eq!(round_to(2.884_811, 2), 2.88);
/// assert_eq!(round_to(-0.99951, 3), -1.0);
/// ```
#[inline]
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = pow10(places);
    round(value * scale) / scale
}

#[inline]
fn pow10(places: u32) -> f64 {
    let mut scale = 1.0;
    for _ in 0..places {
        scale *= 10.0;
    }
    scale
}

#[cfg(feature = "std")]
#[inline]
pub(crate) fn sin(x: f64) -> f64 {
    x.sin()
}

#[cfg(not(feature = "std"))]
#[inline]
pub(crate) fn sin(x: f64) -> f64 {
    libm::sin(x)
}

#[cfg(feature = "std")]
#[inline]
pub(crate) fn cos(x: f64) -> f64 {
    x.cos()
}

#[cfg(not(feature = "std"))]
#[inline]
pub(crate) fn cos(x: f64) -> f64 {
    libm::cos(x)
}

#[cfg(feature = "std")]
#[inline]
pub(crate) fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[cfg(not(feature = "std"))]
#[inline]
pub(crate) fn sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

#[cfg(feature = "std")]
#[inline]
fn round(x: f64) -> f64 {
    x.round()
}

#[cfg(not(feature = "std"))]
#[inline]
fn round(x: f64) -> f64 {
    libm::round(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_two_places() {
        assert_eq!(round_to(10.193_679, 2), 10.19);
        assert_eq!(round_to(40.774_719, 2), 40.77);
        assert_eq!(round_to(0.005, 2), 0.01);
    }

    #[test]
    fn test_round_to_three_places() {
        assert_eq!(round_to(0.309_016_99, 3), 0.309);
        assert_eq!(round_to(-0.809_017, 3), -0.809);
    }

    #[test]
    fn test_round_to_zero_places() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn test_round_keeps_non_finite() {
        assert!(round_to(f64::NAN, 2).is_nan());
        assert!(round_to(f64::INFINITY, 2).is_infinite());
    }
}
