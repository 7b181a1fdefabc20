//! Discrete time values and the per-phase tick counter.
//!
//! The engine's native time unit is the tick: the host loop advances the
//! simulation exactly one tick per iteration. Named units convert to ticks
//! through a fixed ratio table (20 ticks per second, 60 seconds per
//! minute, 60 minutes per hour). All conversions are integral; there is no
//! fractional time anywhere in the engine.
//!
//! # Design Principles
//!
//! - The tick counter is the source of truth. Elapsed seconds, minutes,
//!   and cycle boundaries are always derived from it, never stored.
//! - All arithmetic saturates rather than wrapping; a match that somehow
//!   runs for `u64::MAX` ticks stays pinned there instead of restarting.
//! - A [`Ticker`] with a zero-tick interval is unconstructible, because
//!   cycle detection would divide by zero.

use serde::{Deserialize, Serialize};

/// Ticks in one second of simulated time.
const TICKS_PER_SECOND: u64 = 20;

/// Ticks in one minute of simulated time.
const TICKS_PER_MINUTE: u64 = TICKS_PER_SECOND * 60;

/// Ticks in one hour of simulated time.
const TICKS_PER_HOUR: u64 = TICKS_PER_MINUTE * 60;

/// Errors that can occur constructing time primitives.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TimeError {
    /// A ticker was given an interval of zero ticks.
    #[error("ticker interval must be at least one tick")]
    ZeroInterval,
}

/// A named unit of simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    /// The engine's native discrete unit.
    Ticks,
    /// 20 ticks.
    Seconds,
    /// 60 seconds.
    Minutes,
    /// 60 minutes.
    Hours,
}

impl TimeUnit {
    /// Number of ticks in one of this unit.
    pub const fn ticks(self) -> u64 {
        match self {
            Self::Ticks => 1,
            Self::Seconds => TICKS_PER_SECOND,
            Self::Minutes => TICKS_PER_MINUTE,
            Self::Hours => TICKS_PER_HOUR,
        }
    }
}

/// An immutable duration: an integer amount of a named unit.
///
/// Values are created by [`TimeValue::of`] and never mutated;
/// [`add`](TimeValue::add) and [`multiply`](TimeValue::multiply) return
/// new values. The zero and single-unit values are canonical constants so
/// hot paths can compare against them without conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeValue {
    unit: TimeUnit,
    amount: u64,
}

impl TimeValue {
    /// The zero duration.
    pub const ZERO: Self = Self {
        unit: TimeUnit::Ticks,
        amount: 0,
    };

    /// Exactly one tick.
    pub const ONE_TICK: Self = Self {
        unit: TimeUnit::Ticks,
        amount: 1,
    };

    /// Exactly one second (20 ticks).
    pub const ONE_SECOND: Self = Self {
        unit: TimeUnit::Seconds,
        amount: 1,
    };

    /// Create a duration of `amount` of `unit`.
    ///
    /// Zero amounts normalize to the canonical [`TimeValue::ZERO`] so that
    /// "no time" compares equal regardless of the unit it was requested in.
    pub const fn of(unit: TimeUnit, amount: u64) -> Self {
        if amount == 0 {
            return Self::ZERO;
        }
        Self { unit, amount }
    }

    /// Create a duration of `amount` seconds.
    pub const fn seconds(amount: u64) -> Self {
        Self::of(TimeUnit::Seconds, amount)
    }

    /// Create a duration of `amount` ticks.
    pub const fn ticks_value(amount: u64) -> Self {
        Self::of(TimeUnit::Ticks, amount)
    }

    /// The unit this value was expressed in.
    pub const fn unit(self) -> TimeUnit {
        self.unit
    }

    /// The raw amount in this value's own unit.
    pub const fn amount(self) -> u64 {
        self.amount
    }

    /// Convert to the engine's native tick count (saturating).
    pub const fn to_ticks(self) -> u64 {
        self.amount.saturating_mul(self.unit.ticks())
    }

    /// Convert to whole seconds, rounding down.
    pub const fn to_seconds(self) -> u64 {
        self.to_ticks() / TICKS_PER_SECOND
    }

    /// Re-express this duration in another unit, rounding down.
    pub const fn convert_to(self, unit: TimeUnit) -> Self {
        Self::of(unit, self.to_ticks() / unit.ticks())
    }

    /// Return the sum of two durations, expressed in ticks (saturating).
    pub const fn add(self, other: Self) -> Self {
        Self::of(TimeUnit::Ticks, self.to_ticks().saturating_add(other.to_ticks()))
    }

    /// Return this duration multiplied by a scalar (saturating).
    pub const fn multiply(self, factor: u64) -> Self {
        Self::of(self.unit, self.amount.saturating_mul(factor))
    }

    /// Whether this is the zero duration.
    pub const fn is_zero(self) -> bool {
        self.amount == 0
    }
}

impl core::fmt::Display for TimeValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let suffix = match self.unit {
            TimeUnit::Ticks => "t",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
        };
        write!(f, "{}{suffix}", self.amount)
    }
}

/// A mutable monotonic tick counter bound to an interval.
///
/// One ticker is created per phase and destroyed with it. The counter
/// only moves forward except through the explicit [`set`](Ticker::set) and
/// [`reset`](Ticker::reset) overrides, which phases use to pause or
/// restart a countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    ticks: u64,
    interval: TimeValue,
}

impl Ticker {
    /// Create a ticker that advances by `interval` per [`tick`](Ticker::tick).
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::ZeroInterval`] if the interval converts to
    /// zero ticks, which would make cycle detection divide by zero.
    pub const fn new(interval: TimeValue) -> Result<Self, TimeError> {
        if interval.to_ticks() == 0 {
            return Err(TimeError::ZeroInterval);
        }
        Ok(Self { ticks: 0, interval })
    }

    /// Create a ticker advancing one native tick per call.
    pub const fn per_tick() -> Self {
        // ONE_TICK is non-zero by construction.
        Self {
            ticks: 0,
            interval: TimeValue::ONE_TICK,
        }
    }

    /// Advance the counter by one interval. Returns the new counter value.
    pub const fn tick(&mut self) -> u64 {
        self.ticks = self.ticks.saturating_add(1);
        self.ticks
    }

    /// Override the counter to an absolute value.
    pub const fn set(&mut self, ticks: u64) {
        self.ticks = ticks;
    }

    /// Reset the counter to zero.
    pub const fn reset(&mut self) {
        self.ticks = 0;
    }

    /// The raw counter value (number of intervals elapsed).
    pub const fn count(&self) -> u64 {
        self.ticks
    }

    /// Total elapsed time in native ticks (counter times interval).
    pub const fn elapsed_ticks(&self) -> u64 {
        self.ticks.saturating_mul(self.interval.to_ticks())
    }

    /// Total elapsed time converted to the requested unit, rounding down.
    pub const fn elapsed(&self, unit: TimeUnit) -> u64 {
        self.elapsed_ticks() / unit.ticks()
    }

    /// Whether the current elapsed time falls on an `n * unit` boundary.
    ///
    /// This is the periodic-trigger primitive behind countdown broadcasts
    /// and sound cues. `n == 0` never cycles.
    pub const fn is_cycling(&self, n: u64, unit: TimeUnit) -> bool {
        let period = n.saturating_mul(unit.ticks());
        if period == 0 {
            return false;
        }
        self.elapsed_ticks() % period == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn one_second_is_twenty_ticks() {
        assert_eq!(TimeValue::of(TimeUnit::Seconds, 1).to_ticks(), 20);
    }

    #[test]
    fn two_minutes_convert_to_seconds() {
        let two_minutes = TimeValue::of(TimeUnit::Minutes, 2).convert_to(TimeUnit::Seconds);
        assert_eq!(two_minutes.to_ticks(), TimeValue::of(TimeUnit::Seconds, 120).to_ticks());
    }

    #[test]
    fn zero_normalizes_to_canonical() {
        assert_eq!(TimeValue::of(TimeUnit::Minutes, 0), TimeValue::ZERO);
        assert!(TimeValue::of(TimeUnit::Hours, 0).is_zero());
    }

    #[test]
    fn add_and_multiply() {
        let v = TimeValue::seconds(2).add(TimeValue::ticks_value(5));
        assert_eq!(v.to_ticks(), 45);
        assert_eq!(TimeValue::seconds(3).multiply(4).to_seconds(), 12);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert_eq!(Ticker::new(TimeValue::ZERO), Err(TimeError::ZeroInterval));
        assert!(Ticker::new(TimeValue::ONE_TICK).is_ok());
    }

    #[test]
    fn ticker_advances_and_resets() {
        let mut ticker = Ticker::per_tick();
        assert_eq!(ticker.tick(), 1);
        assert_eq!(ticker.tick(), 2);
        ticker.set(100);
        assert_eq!(ticker.count(), 100);
        ticker.reset();
        assert_eq!(ticker.count(), 0);
    }

    #[test]
    fn elapsed_converts_units() {
        let mut ticker = Ticker::per_tick();
        for _ in 0..40 {
            let _ = ticker.tick();
        }
        assert_eq!(ticker.elapsed(TimeUnit::Ticks), 40);
        assert_eq!(ticker.elapsed(TimeUnit::Seconds), 2);
        assert_eq!(ticker.elapsed(TimeUnit::Minutes), 0);
    }

    #[test]
    fn is_cycling_truth_table() {
        // Interval of 1 tick, n = 5 seconds => period 100 ticks.
        let mut ticker = Ticker::per_tick();
        assert!(ticker.is_cycling(5, TimeUnit::Seconds)); // elapsed 0

        for expect in [(50, false), (100, true), (150, false), (200, true)] {
            while ticker.count() < expect.0 {
                let _ = ticker.tick();
            }
            assert_eq!(
                ticker.is_cycling(5, TimeUnit::Seconds),
                expect.1,
                "at elapsed {}",
                expect.0
            );
        }
    }

    #[test]
    fn is_cycling_zero_period_never_fires() {
        let ticker = Ticker::per_tick();
        assert!(!ticker.is_cycling(0, TimeUnit::Seconds));
    }

    #[test]
    fn wide_interval_scales_elapsed() {
        let mut ticker = Ticker::new(TimeValue::seconds(1)).unwrap();
        let _ = ticker.tick();
        let _ = ticker.tick();
        assert_eq!(ticker.elapsed(TimeUnit::Ticks), 40);
        assert_eq!(ticker.elapsed(TimeUnit::Seconds), 2);
    }
}
