//! # Pullet16 Simulator
//!
//! A simulator for the Pullet16, a minimal 16-bit accumulator machine.
//!
//! Programs are flat arrays of 16-bit words. Each instruction carries a
//! 3-bit opcode, a direct/indirect flag and a 12-bit target; execution
//! runs until STP, until the PC leaves the loaded program, until 128
//! instructions have executed, or until a fault.

pub mod bits;
pub mod cpu;
pub mod image;

// Re-export commonly used types
pub use bits::{BitError, BitWidth, HexToken, Word};
pub use cpu::{Cpu, CpuError, CpuState, Halt, Instruction, Io, Memory, Registers};
pub use image::{disassemble, load_program, parse_program, LoadError};
