//! Conversion between binary digit strings and unsigned integers.
//!
//! Only three widths are ever materialised: 8 (bytes), 12 (addresses)
//! and 16 (words). The width is a closed enum so an unsupported width
//! can only enter through [`BitWidth::from_bits`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The digit-string widths the codec can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitWidth {
    /// 8 digits (one byte).
    Byte,
    /// 12 digits (an address or extended selector).
    Address,
    /// 16 digits (a full word).
    Word,
}

impl BitWidth {
    /// Number of digits produced for this width.
    pub const fn digits(self) -> usize {
        match self {
            BitWidth::Byte => 8,
            BitWidth::Address => 12,
            BitWidth::Word => 16,
        }
    }

    /// Largest value representable at this width.
    pub const fn max_value(self) -> u32 {
        (1u32 << self.digits()) - 1
    }

    /// Look up a width by digit count.
    pub fn from_bits(bits: usize) -> Result<Self, BitError> {
        match bits {
            8 => Ok(BitWidth::Byte),
            12 => Ok(BitWidth::Address),
            16 => Ok(BitWidth::Word),
            other => Err(BitError::UnsupportedWidth(other)),
        }
    }
}

/// Interpret a string of `0`/`1` characters as an unsigned base-2 integer.
pub fn to_integer(bits: &str) -> Result<u32, BitError> {
    if bits.is_empty() {
        return Err(BitError::Empty);
    }

    let mut value: u32 = 0;
    for (pos, c) in bits.chars().enumerate() {
        let digit = match c {
            '0' => 0,
            '1' => 1,
            _ => return Err(BitError::InvalidDigit { pos, found: c }),
        };
        value = value
            .checked_mul(2)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| BitError::Overflow(bits.len()))?;
    }

    Ok(value)
}

/// Render `value` as unsigned binary, zero-padded to exactly `width` digits.
///
/// Values wider than the field keep their low-order digits, the same
/// truncation a fixed-size bitset performs.
pub fn to_bit_string(value: u32, width: BitWidth) -> String {
    let masked = value & width.max_value();
    format!("{:0width$b}", masked, width = width.digits())
}

/// Errors that can occur during digit-string conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitError {
    #[error("empty bit string")]
    Empty,

    #[error("invalid binary digit {found:?} at position {pos}")]
    InvalidDigit { pos: usize, found: char },

    #[error("bit string of {0} digits does not fit in 32 bits")]
    Overflow(usize),

    #[error("wrong bit string length: expected {expected}, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("unsupported bit string width {0} (expected 8, 12 or 16)")]
    UnsupportedWidth(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_integer() {
        assert_eq!(to_integer("0").unwrap(), 0);
        assert_eq!(to_integer("101").unwrap(), 5);
        assert_eq!(to_integer("000000000011").unwrap(), 3);
        assert_eq!(to_integer("1111111111111111").unwrap(), 65535);
    }

    #[test]
    fn test_to_integer_rejects_non_binary() {
        assert_eq!(
            to_integer("10201").unwrap_err(),
            BitError::InvalidDigit { pos: 2, found: '2' }
        );
        assert_eq!(to_integer("").unwrap_err(), BitError::Empty);
        assert!(to_integer(" 101").is_err());
    }

    #[test]
    fn test_to_integer_overflow() {
        let long = "1".repeat(33);
        assert_eq!(to_integer(&long).unwrap_err(), BitError::Overflow(33));
    }

    #[test]
    fn test_to_bit_string_widths() {
        assert_eq!(to_bit_string(5, BitWidth::Byte), "00000101");
        assert_eq!(to_bit_string(5, BitWidth::Address), "000000000101");
        assert_eq!(to_bit_string(5, BitWidth::Word), "0000000000000101");
        assert_eq!(to_bit_string(0x1_0001, BitWidth::Word), "0000000000000001");
    }

    #[test]
    fn test_width_lookup() {
        assert_eq!(BitWidth::from_bits(12).unwrap(), BitWidth::Address);
        assert_eq!(BitWidth::from_bits(10).unwrap_err(), BitError::UnsupportedWidth(10));
        assert_eq!(BitWidth::Word.max_value(), 65535);
    }

    proptest! {
        #[test]
        fn prop_word_string_roundtrip(bits in "[01]{16}") {
            let value = to_integer(&bits).unwrap();
            prop_assert_eq!(to_bit_string(value, BitWidth::Word), bits);
        }

        #[test]
        fn prop_value_roundtrip(value in 0u32..4096) {
            let bits = to_bit_string(value, BitWidth::Address);
            prop_assert_eq!(bits.len(), 12);
            prop_assert_eq!(to_integer(&bits).unwrap(), value);
        }
    }
}
