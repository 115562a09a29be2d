//! The 16-bit Pullet16 word.
//!
//! Memory cells, instructions and the stored accumulator all share this
//! representation. Instruction layout, most significant bit first:
//! - Bits 15-13: Opcode (3 bits)
//! - Bit 12: Address mode (0 = direct, 1 = indirect)
//! - Bits 11-0: Target address or extended selector (12 bits)

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::bits::codec::{self, BitError, BitWidth};

/// A 16-bit word, stored as an unsigned integer.
///
/// The digit-string form only exists at the edges (program text,
/// traces, output lines) and converts losslessly in both directions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(u16);

impl Word {
    /// Number of bits in a word.
    pub const WIDTH: usize = 16;

    /// Number of bits in the target field.
    pub const TARGET_BITS: usize = 12;

    const TARGET_MASK: u16 = 0x0FFF;

    /// Create a word with all bits clear.
    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Wrap a raw 16-bit pattern.
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Assemble a word from its three instruction fields.
    ///
    /// Out-of-range field values are masked to their widths.
    pub const fn from_fields(opcode: u8, mode: u8, target: u16) -> Self {
        let op = ((opcode & 0b111) as u16) << 13;
        let m = ((mode & 1) as u16) << 12;
        Self(op | m | (target & Self::TARGET_MASK))
    }

    /// The raw 16-bit pattern.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// The opcode field (first three digits).
    #[inline]
    pub const fn opcode(self) -> u8 {
        (self.0 >> 13) as u8
    }

    /// The address-mode flag (fourth digit).
    #[inline]
    pub const fn mode_bit(self) -> u8 {
        ((self.0 >> 12) & 1) as u8
    }

    /// The 12-bit target field (last twelve digits).
    #[inline]
    pub const fn target(self) -> u16 {
        self.0 & Self::TARGET_MASK
    }

    /// Parse a 16-character string of `0`/`1` digits.
    pub fn parse(s: &str) -> Result<Self, BitError> {
        let got = s.chars().count();
        if got != Self::WIDTH {
            return Err(BitError::WrongLength { expected: Self::WIDTH, got });
        }
        let value = codec::to_integer(s)?;
        Ok(Self(value as u16))
    }

    /// The 16-digit string form.
    pub fn to_bits(self) -> String {
        codec::to_bit_string(self.0 as u32, BitWidth::Word)
    }

    /// The opcode field as three digits.
    pub fn opcode_bits(self) -> String {
        format!("{:03b}", self.opcode())
    }

    /// The target field as twelve digits.
    pub fn target_bits(self) -> String {
        codec::to_bit_string(self.target() as u32, BitWidth::Address)
    }
}

impl From<u16> for Word {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Word> for u16 {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl std::str::FromStr for Word {
    type Err = BitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Word::parse(s)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:016b} = {})", self.0, self.0)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_fields() {
        let w = Word::parse("1011000000000101").unwrap();
        assert_eq!(w.opcode(), 0b101);
        assert_eq!(w.mode_bit(), 1);
        assert_eq!(w.target(), 5);
        assert_eq!(w.opcode_bits(), "101");
        assert_eq!(w.target_bits(), "000000000101");
    }

    #[test]
    fn test_from_fields() {
        let w = Word::from_fields(0b111, 0, 3);
        assert_eq!(w.to_bits(), "1110000000000011");
        assert_eq!(Word::from_fields(0b100, 1, 0x0FFF).to_bits(), "1001111111111111");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(
            Word::parse("101").unwrap_err(),
            BitError::WrongLength { expected: 16, got: 3 }
        );
        assert_eq!(
            Word::parse("11100000000000001").unwrap_err(),
            BitError::WrongLength { expected: 16, got: 17 }
        );
        assert!(Word::parse("111000000000000x").is_err());
    }

    #[test]
    fn test_display_is_padded() {
        assert_eq!(Word::new(1).to_string(), "0000000000000001");
        assert_eq!(format!("{:?}", Word::new(2)), "Word(0000000000000010 = 2)");
    }
}
