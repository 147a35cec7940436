//! Elapsed time between two tick readings

use core::cmp::Ordering;

use crate::traits::TickCount;

/// Elapsed ticks from `previous` to `current`
///
/// A reading lower than `previous` means the counter wrapped past
/// [`TickCount::MAX`]; the result is then `current + (MAX - previous)`.
/// Total over every pair of inputs: the wrapped sum is always below `MAX`.
pub fn compute_delta<T: TickCount>(previous: T, current: T) -> T {
    match current.cmp(&previous) {
        Ordering::Equal => T::ZERO,
        Ordering::Greater => current - previous,
        Ordering::Less => current + (T::MAX - previous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_time_passed() {
        assert_eq!(compute_delta(42u32, 42u32), 0);
        assert_eq!(compute_delta(u32::MAX, u32::MAX), 0);
    }

    #[test]
    fn test_forward() {
        assert_eq!(compute_delta(100u32, 350u32), 250);
        assert_eq!(compute_delta(0u8, 255u8), 255);
    }

    #[test]
    fn test_wrap_8bit() {
        assert_eq!(compute_delta(250u8, 10u8), 15);
        assert_eq!(compute_delta(255u8, 0u8), 0);
        assert_eq!(compute_delta(1u8, 0u8), 254);
    }

    #[test]
    fn test_wrap_32bit() {
        assert_eq!(compute_delta(u32::MAX - 5, 4u32), 9);
    }

    proptest! {
        #[test]
        fn prop_forward_is_difference(a in any::<u16>(), b in any::<u16>()) {
            let (previous, current) = if a <= b { (a, b) } else { (b, a) };
            prop_assert_eq!(compute_delta(previous, current), current - previous);
        }

        #[test]
        fn prop_wrap_formula(
            (previous, current) in (1u8..=255).prop_flat_map(|p| (Just(p), 0..p))
        ) {
            prop_assert_eq!(compute_delta(previous, current), (u8::MAX - previous) + current);
        }

        #[test]
        fn prop_same_reading_is_zero(t in any::<u32>()) {
            prop_assert_eq!(compute_delta(t, t), 0);
        }
    }
}
