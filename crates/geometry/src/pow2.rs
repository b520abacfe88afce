//! Power-of-two alignment.
//!
//! The grid stays centered on the origin, with every boundary at a signed power of two.  These functions round a
//! requested boundary outward, away from zero, while keeping it on the same side of the origin.

/// Smallest power of two `>= n`.  Returns 1 for `n <= 1`.
///
/// # Panics
///
/// If the result does not fit in a `u32`, that is `n > 2^31`.  Use [checked_next_power_of_two] for untrusted input.
pub fn next_power_of_two(n: u32) -> u32 {
    match checked_next_power_of_two(n) {
        Some(p) => p,
        None => panic!("next power of two of {} overflows u32", n),
    }
}

pub fn checked_next_power_of_two(n: u32) -> Option<u32> {
    n.max(1).checked_next_power_of_two()
}

/// The next power of two of `|n|`, with the sign of `n`.  Zero maps to 1.
///
/// `-3 -> -4`, `3 -> 4`, `0 -> 1`, `-4 -> -4`.
///
/// # Panics
///
/// If the result does not fit in an `i32`, that is `n > 2^30`.  `i32::MIN` is itself a power of two and is fine.
pub fn signed_next_power_of_two(n: i32) -> i32 {
    match checked_signed_next_power_of_two(n) {
        Some(p) => p,
        None => panic!("signed next power of two of {} overflows i32", n),
    }
}

pub fn checked_signed_next_power_of_two(n: i32) -> Option<i32> {
    if n == 0 {
        return Some(1);
    }

    let magnitude = checked_next_power_of_two(n.unsigned_abs())? as i64;
    let signed = if n < 0 { -magnitude } else { magnitude };
    i32::try_from(signed).ok()
}

/// Whether `n` is a signed power of two, i.e. a value [signed_next_power_of_two] leaves alone.
pub fn is_power_of_two_aligned(n: i32) -> bool {
    n.unsigned_abs().is_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_unsigned_small() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(1 << 31), 1 << 31);
        assert_eq!(checked_next_power_of_two((1 << 31) + 1), None);
    }

    #[test]
    fn test_signed_small() {
        assert_eq!(signed_next_power_of_two(0), 1);
        assert_eq!(signed_next_power_of_two(3), 4);
        assert_eq!(signed_next_power_of_two(-3), -4);
        assert_eq!(signed_next_power_of_two(-1), -1);
        assert_eq!(signed_next_power_of_two(-4), -4);
        assert_eq!(signed_next_power_of_two(17), 32);
    }

    #[test]
    fn test_signed_limits() {
        assert_eq!(checked_signed_next_power_of_two(i32::MIN), Some(i32::MIN));
        assert_eq!(checked_signed_next_power_of_two(i32::MIN + 1), Some(i32::MIN));
        assert_eq!(checked_signed_next_power_of_two(1 << 30), Some(1 << 30));
        assert_eq!(checked_signed_next_power_of_two((1 << 30) + 1), None);
        assert_eq!(checked_signed_next_power_of_two(i32::MAX), None);
    }

    proptest! {
        #[test]
        fn signed_keeps_sign_and_bounds(n in -(1i32 << 30)..=(1i32 << 30)) {
            let p = signed_next_power_of_two(n);
            prop_assert!(is_power_of_two_aligned(p));
            prop_assert!(p.unsigned_abs() >= n.unsigned_abs());
            if n != 0 {
                prop_assert_eq!(p.signum(), n.signum());
                // Never more than doubles.
                prop_assert!(p.unsigned_abs() < n.unsigned_abs() * 2);
            }
        }

        #[test]
        fn signed_is_idempotent(n in -(1i32 << 30)..=(1i32 << 30)) {
            let p = signed_next_power_of_two(n);
            prop_assert_eq!(signed_next_power_of_two(p), p);
        }

        #[test]
        fn unsigned_is_smallest(n in 2u32..=(1u32 << 31)) {
            let p = next_power_of_two(n);
            prop_assert!(p.is_power_of_two());
            prop_assert!(p >= n);
            prop_assert!(p / 2 < n);
        }
    }
}
