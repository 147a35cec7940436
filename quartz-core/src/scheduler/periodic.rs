//! Per-task elapsed time accumulator
//!
//! Elapsed time is banked on every pass. Each whole period in the bank
//! fires the task once and is withdrawn; the remainder carries over, so
//! the average firing rate does not depend on how the loop is sliced.

use crate::config::ConfigError;
use crate::traits::TickCount;

/// Time bank for one periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicTask<T> {
    /// Firing period, never zero
    period: T,
    /// Banked time, always below `period` between passes
    accumulated: T,
}

impl<T: TickCount> PeriodicTask<T> {
    /// Create an accumulator with an empty bank
    ///
    /// A zero period would fire without bound and is rejected.
    pub fn new(period: T) -> Result<Self, ConfigError> {
        if period == T::ZERO {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(Self {
            period,
            accumulated: T::ZERO,
        })
    }

    /// Firing period
    pub fn period(&self) -> T {
        self.period
    }

    /// Time banked since the last firing
    pub fn accumulated(&self) -> T {
        self.accumulated
    }

    /// Bank `delta` and fire once per whole period now held
    ///
    /// Equivalent to adding `delta` and then firing and subtracting the
    /// period while the bank is at least one period. The bank is filled
    /// against its remaining headroom so it never overflows `T`.
    ///
    /// Returns the number of firings in this call.
    pub fn advance<F: FnMut()>(&mut self, delta: T, mut fire: F) -> u32 {
        let mut remaining = delta;
        let mut fired: u32 = 0;

        loop {
            let headroom = self.period - self.accumulated;
            if remaining < headroom {
                self.accumulated += remaining;
                return fired;
            }

            remaining -= headroom;
            self.accumulated = T::ZERO;
            fire();
            fired = fired.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn count_firings<T: TickCount>(task: &mut PeriodicTask<T>, delta: T) -> u32 {
        let mut calls = 0;
        let fired = task.advance(delta, || calls += 1);
        assert_eq!(fired, calls);
        fired
    }

    #[test]
    fn test_zero_period_rejected() {
        assert_eq!(PeriodicTask::new(0u32), Err(ConfigError::ZeroPeriod));
        assert!(PeriodicTask::new(1u32).is_ok());
    }

    #[test]
    fn test_below_period_banks() {
        let mut task = PeriodicTask::new(500u32).unwrap();
        assert_eq!(count_firings(&mut task, 499), 0);
        assert_eq!(task.accumulated(), 499);
    }

    #[test]
    fn test_exact_period_fires() {
        let mut task = PeriodicTask::new(500u32).unwrap();
        assert_eq!(count_firings(&mut task, 500), 1);
        assert_eq!(task.accumulated(), 0);
    }

    #[test]
    fn test_catch_up_firing() {
        // 3.5 periods in one pass
        let mut task = PeriodicTask::new(100u32).unwrap();
        assert_eq!(count_firings(&mut task, 350), 3);
        assert_eq!(task.accumulated(), 50);
    }

    #[test]
    fn test_heartbeat_scenario() {
        let mut task = PeriodicTask::new(500u32).unwrap();

        let fired: u32 = [100, 150, 200, 200]
            .into_iter()
            .map(|delta| count_firings(&mut task, delta))
            .sum();
        assert_eq!(fired, 1);
        assert_eq!(task.accumulated(), 150);

        assert_eq!(count_firings(&mut task, 350), 1);
        assert_eq!(task.accumulated(), 0);
    }

    #[test]
    fn test_bank_does_not_overflow_narrow_counter() {
        let mut task = PeriodicTask::new(250u8).unwrap();
        assert_eq!(count_firings(&mut task, 200), 0);
        // 200 + 100 does not fit in a u8
        assert_eq!(count_firings(&mut task, 100), 1);
        assert_eq!(task.accumulated(), 50);
    }

    proptest! {
        #[test]
        fn prop_rate_independent_of_slicing(period in 1u32..1000, total in 0u32..20_000) {
            let mut whole = PeriodicTask::new(period).unwrap();
            let mut sliced = PeriodicTask::new(period).unwrap();

            let fired_whole = count_firings(&mut whole, total);
            let fired_sliced: u32 = (0..total).map(|_| count_firings(&mut sliced, 1)).sum();

            prop_assert_eq!(fired_whole, total / period);
            prop_assert_eq!(fired_sliced, fired_whole);
            prop_assert_eq!(whole.accumulated(), sliced.accumulated());
        }

        #[test]
        fn prop_bank_stays_below_period(
            period in 1u16..500,
            deltas in proptest::collection::vec(any::<u16>(), 0..64),
        ) {
            let mut task = PeriodicTask::new(period).unwrap();
            let mut total: u64 = 0;
            let mut fired: u64 = 0;

            for delta in deltas {
                fired += u64::from(count_firings(&mut task, delta));
                total += u64::from(delta);
                prop_assert!(task.accumulated() < task.period());
            }

            prop_assert_eq!(fired, total / u64::from(period));
            prop_assert_eq!(u64::from(task.accumulated()), total % u64::from(period));
        }
    }
}
