//! Monotonic tick counter traits

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Sub, SubAssign};

/// Millisecond tick count used by the firmware
pub type Millis = u32;

/// Unsigned, fixed-width tick counter that wraps at [`TickCount::MAX`]
///
/// Arithmetic through this trait never wraps: callers only add or subtract
/// values they have already bounded against `MAX`.
pub trait TickCount:
    Copy
    + Ord
    + Default
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + AddAssign
    + SubAssign
{
    /// Zero ticks
    const ZERO: Self;

    /// Largest value the counter can hold before wrapping to zero
    const MAX: Self;
}

macro_rules! impl_tick_count {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TickCount for $ty {
                const ZERO: Self = 0;
                const MAX: Self = <$ty>::MAX;
            }
        )*
    };
}

impl_tick_count!(u8, u16, u32, u64, usize);

/// Free-running tick counter
///
/// Implementations read a counter that some other agent (usually a timer
/// interrupt) advances at a fixed real-time rate. Readers never write it.
pub trait TickSource {
    /// Counter width
    type Count: TickCount;

    /// Read the current counter value
    fn now(&self) -> Self::Count;
}

impl<S: TickSource + ?Sized> TickSource for &S {
    type Count = S::Count;

    fn now(&self) -> Self::Count {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Counter(Cell<u16>);

    impl TickSource for Counter {
        type Count = u16;

        fn now(&self) -> u16 {
            self.0.get()
        }
    }

    #[test]
    fn test_max_matches_type_range() {
        assert_eq!(<u8 as TickCount>::MAX, 255);
        assert_eq!(<u16 as TickCount>::MAX, u16::MAX);
        assert_eq!(<u32 as TickCount>::MAX, u32::MAX);
        assert_eq!(<u64 as TickCount>::ZERO, 0);
    }

    #[test]
    fn test_source_by_reference() {
        let counter = Counter(Cell::new(7));
        let by_ref = &counter;
        assert_eq!(by_ref.now(), 7);

        counter.0.set(8);
        assert_eq!(by_ref.now(), 8);
    }
}
