//! Time-sampled trajectory points and the interactive parameter ranges.

/// One `(time, position...)` point of a simulated motion.
///
/// A run produces an ordered `Vec` of samples where insertion order is time
/// order. Runs are never merged; a fresh simulation produces a fresh vector.
///
/// The meaning of the position fields depends on the mode:
///
/// | Mode | `primary` | `secondary` |
/// |------|-----------|-------------|
/// | projectile | height (m) | horizontal distance (m) |
/// | oscillator | displacement (m) | `None` |
///
/// Values are rounded for display when the sample is emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectorySample {
    /// Seconds since launch (or release).
    pub time: f64,
    /// Primary position coordinate in meters.
    pub primary: f64,
    /// Secondary position coordinate in meters, if the mode has one.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub secondary: Option<f64>,
}

impl TrajectorySample {
    /// Creates a projectile sample.
    #[inline]
    pub const fn projectile(time: f64, height: f64, distance: f64) -> Self {
        Self {
            time,
            primary: height,
            secondary: Some(distance),
        }
    }

    /// Creates an oscillator sample.
    #[inline]
    pub const fn oscillator(time: f64, displacement: f64) -> Self {
        Self {
            time,
            primary: displacement,
            secondary: None,
        }
    }

    /// Height above the launch point (projectile samples).
    #[inline]
    pub const fn height(&self) -> f64 {
        self.primary
    }

    /// Horizontal distance from the launch point (projectile samples).
    #[inline]
    pub const fn distance(&self) -> Option<f64> {
        self.secondary
    }

    /// Displacement from equilibrium (oscillator samples).
    #[inline]
    pub const fn displacement(&self) -> f64 {
        self.primary
    }
}

/// Closed interval an interactive control may select from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Smallest selectable value.
    pub min: f64,
    /// Largest selectable value.
    pub max: f64,
}

impl ParamRange {
    /// Creates a range. `min` must not exceed `max`.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Pulls `value` into the range. NaN stays NaN so the kernel can
    /// reject it.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Returns whether `value` lies inside the range.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Launch angle control, degrees.
pub const ANGLE_RANGE: ParamRange = ParamRange::new(0.0, 90.0);

/// Initial speed control, m/s.
pub const SPEED_RANGE: ParamRange = ParamRange::new(5.0, 50.0);

/// Oscillator amplitude control, m.
pub const AMPLITUDE_RANGE: ParamRange = ParamRange::new(0.1, 5.0);

/// Spring constant control, N/m.
pub const SPRING_CONSTANT_RANGE: ParamRange = ParamRange::new(5.0, 100.0);
