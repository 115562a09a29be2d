//! Signed hexadecimal input tokens.
//!
//! The `RD` instruction consumes tokens such as `+1A2F`, `-0001` or `7f`:
//! an optional sign followed by one to four hex digits. The decoded value
//! is stored as a 16-bit two's-complement pattern.

use std::fmt;
use thiserror::Error;

/// Largest positive magnitude a token may carry.
pub const MAX_POSITIVE: u32 = 0x7FFF;

/// Largest negative magnitude a token may carry.
pub const MAX_NEGATIVE: u32 = 0x8000;

const MAX_DIGITS: usize = 4;

/// A validated hex token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexToken {
    text: String,
    value: u16,
}

impl HexToken {
    /// Validate and decode a token.
    pub fn parse(text: &str) -> Result<Self, HexError> {
        let trimmed = text.trim();
        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'+') => (false, &trimmed[1..]),
            Some(b'-') => (true, &trimmed[1..]),
            Some(_) => (false, trimmed),
            None => return Err(HexError::Empty),
        };

        if digits.is_empty() {
            return Err(HexError::NoDigits(text.to_string()));
        }
        if digits.len() > MAX_DIGITS {
            return Err(HexError::TooLong(text.to_string()));
        }
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(HexError::InvalidDigit { token: text.to_string(), found: c });
        }

        let magnitude = u32::from_str_radix(digits, 16)
            .map_err(|_| HexError::NoDigits(text.to_string()))?;

        let value = if negative {
            if magnitude > MAX_NEGATIVE {
                return Err(HexError::OutOfRange(text.to_string()));
            }
            ((0x1_0000 - magnitude) & 0xFFFF) as u16
        } else {
            if magnitude > MAX_POSITIVE {
                return Err(HexError::OutOfRange(text.to_string()));
            }
            magnitude as u16
        };

        Ok(Self { text: trimmed.to_string(), value })
    }

    /// The decoded 16-bit pattern.
    pub fn value(&self) -> u16 {
        self.value
    }

    /// The token text as it was read.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for HexToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:04X})", self.text, self.value)
    }
}

/// Reasons a hex token is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("empty hex token")]
    Empty,

    #[error("hex token {0:?} has no digits")]
    NoDigits(String),

    #[error("hex token {0:?} has more than four digits")]
    TooLong(String),

    #[error("hex token {token:?} contains invalid digit {found:?}")]
    InvalidDigit { token: String, found: char },

    #[error("hex token {0:?} is out of 16-bit signed range")]
    OutOfRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_tokens() {
        assert_eq!(HexToken::parse("+0005").unwrap().value(), 5);
        assert_eq!(HexToken::parse("1A2f").unwrap().value(), 0x1A2F);
        assert_eq!(HexToken::parse("+7FFF").unwrap().value(), 0x7FFF);
        assert_eq!(HexToken::parse("  +7FFF ").unwrap().text(), "+7FFF");
    }

    #[test]
    fn test_negative_tokens() {
        assert_eq!(HexToken::parse("-0001").unwrap().value(), 0xFFFF);
        assert_eq!(HexToken::parse("-8000").unwrap().value(), 0x8000);
        assert_eq!(HexToken::parse("-0").unwrap().value(), 0);
    }

    #[test]
    fn test_rejected_tokens() {
        assert_eq!(HexToken::parse("").unwrap_err(), HexError::Empty);
        assert!(matches!(HexToken::parse("+"), Err(HexError::NoDigits(_))));
        assert!(matches!(HexToken::parse("12345"), Err(HexError::TooLong(_))));
        assert!(matches!(
            HexToken::parse("+00G1"),
            Err(HexError::InvalidDigit { found: 'G', .. })
        ));
        assert!(matches!(HexToken::parse("8000"), Err(HexError::OutOfRange(_))));
        assert!(matches!(HexToken::parse("-8001"), Err(HexError::OutOfRange(_))));
    }
}
