//! Accumulator arithmetic.
//!
//! The accumulator is stored as an unsigned 16-bit pattern. All updates
//! wrap modulo 65536; the signed reading is only used for display and
//! for the branch-if-negative test.

/// Interpret a 16-bit pattern as a two's-complement signed value.
#[inline]
pub fn to_signed16(value: u16) -> i32 {
    if value >= 0x8000 {
        value as i32 - 0x1_0000
    } else {
        value as i32
    }
}

/// True when the pattern is negative in two's complement.
#[inline]
pub fn is_negative(value: u16) -> bool {
    value >= 0x8000
}

/// `accum + operand` modulo 65536.
#[inline]
pub fn add(accum: u16, operand: u16) -> u16 {
    accum.wrapping_add(operand)
}

/// `accum - operand` modulo 65536.
#[inline]
pub fn subtract(accum: u16, operand: u16) -> u16 {
    accum.wrapping_sub(operand)
}

/// Bitwise AND of the two patterns.
#[inline]
pub fn and(accum: u16, operand: u16) -> u16 {
    accum & operand
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_signed_boundaries() {
        assert_eq!(to_signed16(0), 0);
        assert_eq!(to_signed16(32767), 32767);
        assert_eq!(to_signed16(32768), -32768);
        assert_eq!(to_signed16(65535), -1);
    }

    #[test]
    fn test_add_wraps() {
        assert_eq!(add(0, 65535), 65535);
        assert_eq!(add(1, 65535), 0);
        assert_eq!(add(40000, 40000), 14464);
    }

    #[test]
    fn test_subtract_wraps() {
        assert_eq!(subtract(0, 1), 65535);
        assert_eq!(subtract(5, 3), 2);
        assert_eq!(subtract(3, 5), 65534);
    }

    #[test]
    fn test_and() {
        assert_eq!(and(0b1100, 0b1010), 0b1000);
        assert_eq!(and(0xFFFF, 0x1234), 0x1234);
    }

    #[test]
    fn test_is_negative() {
        assert!(is_negative(32768));
        assert!(!is_negative(32767));
    }

    proptest! {
        #[test]
        fn prop_signed_interpretation(v in any::<u16>()) {
            let expected = if v < 32768 { v as i32 } else { v as i32 - 65536 };
            prop_assert_eq!(to_signed16(v), expected);
        }

        #[test]
        fn prop_add_matches_modular_sum(a in any::<u16>(), b in any::<u16>()) {
            prop_assert_eq!(add(a, b) as u32, (a as u32 + b as u32) % 65536);
        }

        #[test]
        fn prop_subtract_undoes_add(a in any::<u16>(), b in any::<u16>()) {
            prop_assert_eq!(subtract(add(a, b), b), a);
            prop_assert_eq!(subtract(a, b) as u32, (a as u32 + 65536 - b as u32) % 65536);
        }
    }
}
