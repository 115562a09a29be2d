//! Pullet16 CPU registers.
//!
//! The Pullet16 has 2 registers:
//! - PC: program counter
//! - ACCUM: 16-bit accumulator, held as an unsigned pattern

use crate::bits::{arith, codec, BitWidth};
use serde::{Serialize, Deserialize};

/// Program counter value that marks a normal stop.
pub const PC_FOR_STOP: i32 = 7777;

/// The Pullet16 register file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// Program counter.
    ///
    /// Signed because a branch to address 0 parks it at -1 until the
    /// end-of-cycle increment.
    pub pc: i32,

    /// Accumulator (two's-complement pattern, arithmetic wraps mod 65536)
    pub accum: u16,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self { pc: 0, accum: 0 }
    }

    /// Reset all registers to zero.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.accum = 0;
    }

    /// Increment the program counter by 1.
    /// Returns the old value.
    pub fn advance_pc(&mut self) -> i32 {
        let old = self.pc;
        self.pc += 1;
        old
    }

    /// Redirect execution to `location`.
    ///
    /// The PC is set one short of the target; the end-of-cycle increment
    /// lands it exactly on `location`.
    pub fn jump(&mut self, location: usize) {
        self.pc = location as i32 - 1;
    }

    /// Park the PC on the stop sentinel.
    pub fn stop(&mut self) {
        self.pc = PC_FOR_STOP;
    }

    /// True once a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.pc == PC_FOR_STOP
    }

    /// Signed reading of the accumulator.
    pub fn accum_signed(&self) -> i32 {
        arith::to_signed16(self.accum)
    }

    /// The accumulator as 16 binary digits.
    pub fn accum_bits(&self) -> String {
        codec::to_bit_string(self.accum as u32, BitWidth::Word)
    }

    /// The `WRT` output line: signed value in an 8-wide field, then the bit pattern.
    pub fn output_line(&self) -> String {
        format!("{:>8} {}", self.accum_signed(), self.accum_bits())
    }
}
