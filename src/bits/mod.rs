//! Binary word primitives.
//!
//! This module provides the core types for working with Pullet16 data:
//! - [`codec`] - conversion between digit strings and integers
//! - [`Word`] - a 16-bit memory cell with its instruction fields
//! - [`arith`] - two's-complement accumulator arithmetic
//! - [`HexToken`] - signed hex literals consumed by the `RD` instruction

pub mod codec;
mod word;
pub mod arith;
pub mod hex;

pub use codec::{to_bit_string, to_integer, BitError, BitWidth};
pub use word::Word;
pub use arith::{add, and, is_negative, subtract, to_signed16};
pub use hex::{HexError, HexToken};
