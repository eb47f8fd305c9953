//! # Bounded random delays.
//!
//! [`DelayRange`] describes an inclusive `[min, max]` window and draws uniform
//! samples from it. It backs every timed step of the simulation:
//! - customer arrival delay (`[0, max_customer_delay]`);
//! - manager conversation;
//! - safe processing.
//!
//! Only the bounds are a contract; the distribution is not.

use rand::Rng;
use std::time::Duration;

/// Inclusive window of durations with millisecond resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayRange {
    /// Lower bound (inclusive).
    pub min: Duration,
    /// Upper bound (inclusive).
    pub max: Duration,
}

impl DelayRange {
    /// Creates a range `[min, max]`.
    ///
    /// Bounds are not checked here; see [`Config::validate`](crate::Config::validate).
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Range `[0, max]`.
    pub const fn up_to(max: Duration) -> Self {
        Self::new(Duration::ZERO, max)
    }

    /// Degenerate range that always yields `d`.
    pub const fn fixed(d: Duration) -> Self {
        Self::new(d, d)
    }

    /// Range that always yields zero (handy for fast tests).
    pub const fn zero() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// True if `min <= max`.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Draws a uniform sample in `[min, max]`.
    ///
    /// A degenerate or inverted range returns `min` without touching the RNG.
    pub fn sample(&self) -> Duration {
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        if min_ms >= max_ms {
            return self.min;
        }
        let mut rng = rand::rng();
        Duration::from_millis(rng.random_range(min_ms..=max_ms))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_within_bounds() {
        let range = DelayRange::new(Duration::from_millis(10), Duration::from_millis(50));
        for _ in 0..200 {
            let d = range.sample();
            assert!(d >= Duration::from_millis(10), "{d:?} below min");
            assert!(d <= Duration::from_millis(50), "{d:?} above max");
        }
    }

    #[test]
    fn test_fixed_range_is_constant() {
        let range = DelayRange::fixed(Duration::from_millis(7));
        assert_eq!(range.sample(), Duration::from_millis(7));
        assert_eq!(DelayRange::zero().sample(), Duration::ZERO);
    }

    #[test]
    fn test_inverted_range_falls_back_to_min() {
        let range = DelayRange::new(Duration::from_millis(30), Duration::from_millis(5));
        assert!(!range.is_ordered());
        assert_eq!(range.sample(), Duration::from_millis(30));
    }
}
