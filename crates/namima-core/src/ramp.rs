//! Linear parameter ramps and the safe ranges every write is clamped to.

use crate::constants::MIN_RAMP_SEC;

/// Linear interpolation of a control value between two times.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ramp {
    pub from: f32,
    pub to: f32,
    pub start: f64,
    pub duration: f64,
}

impl Ramp {
    /// Constant value from `at` onward.
    pub fn hold(value: f32, at: f64) -> Self {
        Self {
            from: value,
            to: value,
            start: at,
            duration: 0.0,
        }
    }

    /// Ramp from `from` to `to` starting at `start`. Durations shorter than
    /// `MIN_RAMP_SEC` are lengthened so no change lands as a step.
    pub fn linear(from: f32, to: f32, start: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(MIN_RAMP_SEC),
        }
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn value_at(&self, t: f64) -> f32 {
        if t >= self.end() || self.duration <= 0.0 {
            self.to
        } else if t <= self.start {
            self.from
        } else {
            let a = ((t - self.start) / self.duration) as f32;
            self.from + (self.to - self.from) * a
        }
    }

    #[inline]
    pub fn is_settled(&self, t: f64) -> bool {
        t >= self.end()
    }
}

/// Inclusive range a parameter is clamped into before any ramp is issued.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SafeRange {
    pub min: f32,
    pub max: f32,
}

impl SafeRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, v: f32) -> f32 {
        if v.is_nan() {
            self.min
        } else {
            v.clamp(self.min, self.max)
        }
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_interpolates_and_settles() {
        let r = Ramp::linear(0.0, 1.0, 10.0, 0.5);
        assert_eq!(r.value_at(9.0), 0.0);
        assert!((r.value_at(10.25) - 0.5).abs() < 1e-6);
        assert_eq!(r.value_at(10.5), 1.0);
        assert!(r.is_settled(10.5));
    }

    #[test]
    fn zero_length_ramp_is_lengthened() {
        let r = Ramp::linear(0.0, 1.0, 0.0, 0.0);
        assert!(r.duration >= MIN_RAMP_SEC);
        assert!(r.value_at(MIN_RAMP_SEC / 2.0) < 1.0);
    }
}
