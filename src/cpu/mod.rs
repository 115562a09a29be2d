//! CPU emulation for the Pullet16.
//!
//! This module implements the complete Pullet16 architecture:
//! - Up to 4096 sixteen-bit memory words
//! - 2 registers: PC and the accumulator
//! - 8 opcodes, one of which selects among RD, STP and WRT
//! - Direct and single-level indirect addressing

pub mod memory;
pub mod registers;
pub mod decode;
pub mod address;
pub mod trace;
pub mod io;
pub mod execute;

pub use memory::{Memory, MemoryError, MAX_MEMORY};
pub use registers::{Registers, PC_FOR_STOP};
pub use decode::{decode, encode, AddrMode, DecodeError, Instruction, IoOp, Opcode};
pub use address::{resolve, Resolved};
pub use trace::{LogTrace, NullTrace, RecordingTrace, TraceEvent, TraceKind, TraceSink, WriterTrace};
pub use io::{InputSource, Io, LineWriter, OutputSink, TokenInput};
pub use execute::{Cpu, CpuError, CpuState, Halt, MAX_INSTRUCTIONS};
