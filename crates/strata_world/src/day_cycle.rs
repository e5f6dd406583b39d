//! Day/night cycle.

use std::f32::consts::TAU;

/// Current time of day, in seconds since sunrise.
///
/// The first half of the cycle is day, the second half night.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayCycle {
    duration: f32,
    time: f32,
}

impl DayCycle {
    /// Creates a cycle of `duration` seconds starting at `time`.
    #[must_use]
    pub fn new(duration: f32, time: f32) -> Self {
        Self {
            duration,
            time: time.rem_euclid(duration),
        }
    }

    /// Advances the clock by `dt_ms` milliseconds, wrapping at the end of the day.
    pub fn update(&mut self, dt_ms: f32) {
        self.time = (self.time + dt_ms / 1000.0).rem_euclid(self.duration);
    }

    /// Length of a full day in seconds.
    #[inline]
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds since sunrise.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    /// Fraction of the day elapsed, in `[0, 1)`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.time / self.duration
    }

    /// True during the first half of the cycle.
    #[must_use]
    pub fn is_day(&self) -> bool {
        self.progress() < 0.5
    }

    /// Sunlight intensity: 0 at night, 1 at noon.
    #[must_use]
    pub fn daylight(&self) -> f32 {
        (self.progress() * TAU).sin().max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_wraps() {
        let mut cycle = DayCycle::new(10.0, 9.0);
        cycle.update(2500.0);
        assert!((cycle.time() - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_day_and_night() {
        let noon = DayCycle::new(100.0, 25.0);
        assert!(noon.is_day());
        assert!((noon.daylight() - 1.0).abs() < 1e-4);

        let midnight = DayCycle::new(100.0, 75.0);
        assert!(!midnight.is_day());
        assert!(midnight.daylight().abs() < f32::EPSILON);
    }

    #[test]
    fn test_start_time_is_normalised() {
        assert!((DayCycle::new(10.0, -1.0).time() - 9.0).abs() < 1e-4);
    }
}
