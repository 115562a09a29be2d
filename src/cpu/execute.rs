//! CPU execution engine for the Pullet16.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.
//!
//! Every cycle ends with the same bookkeeping: a PC parked on the stop
//! sentinel halts the run, otherwise the PC is incremented and checked
//! against the loaded program length, then the instruction count is
//! checked against [`MAX_INSTRUCTIONS`]. Branches therefore store
//! `location - 1` into the PC.

use crate::bits::{arith, HexError, HexToken, Word};
use crate::cpu::address;
use crate::cpu::decode::{self, AddrMode, DecodeError, Instruction, IoOp};
use crate::cpu::io::Io;
use crate::cpu::memory::{Memory, MemoryError};
use crate::cpu::registers::Registers;
use crate::cpu::trace::{self, TraceEvent, TraceSink};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Hard ceiling on instructions executed in one run.
pub const MAX_INSTRUCTIONS: u64 = 128;

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU executed STP.
    Stopped,
    /// The PC moved past the loaded program.
    PcOverflow,
    /// The instruction ceiling was reached.
    TimedOut,
    /// CPU encountered a fault.
    Error,
}

/// Why a run ended without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Halt {
    /// STP was executed.
    Stop,
    /// The PC was incremented past the loaded program.
    PcOverflow,
    /// [`MAX_INSTRUCTIONS`] instructions were executed.
    Timeout,
}

impl Halt {
    /// The CPU state this halt leaves behind.
    pub fn state(self) -> CpuState {
        match self {
            Halt::Stop => CpuState::Stopped,
            Halt::PcOverflow => CpuState::PcOverflow,
            Halt::Timeout => CpuState::TimedOut,
        }
    }
}

/// The Pullet16 CPU.
#[derive(Clone, Serialize, Deserialize)]
pub struct Cpu {
    /// CPU registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Current execution state.
    pub state: CpuState,
    /// Instructions executed in this run.
    pub cycles: u64,
    /// Last instruction that completed.
    last_instr: Option<Instruction>,
}

impl Cpu {
    /// Create a new CPU with zeroed state and empty memory.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            state: CpuState::Running,
            cycles: 0,
            last_instr: None,
        }
    }

    /// Load a program into memory and prepare a fresh run.
    pub fn load_program(&mut self, program: &[Word]) -> Result<(), MemoryError> {
        self.mem.load_program(program)?;
        self.regs.reset();
        self.state = CpuState::Running;
        self.cycles = 0;
        self.last_instr = None;
        Ok(())
    }

    /// Execute a single instruction.
    ///
    /// Returns `Some(halt)` when this instruction ended the run. A fault
    /// leaves the CPU in [`CpuState::Error`]; nothing is rolled back.
    pub fn step(&mut self, io: &mut Io<'_>) -> Result<Option<Halt>, CpuError> {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        let pc = self.regs.pc;
        match self.cycle(io) {
            Ok(halt) => Ok(halt),
            Err(e) => {
                self.state = CpuState::Error;
                io.trace.event(&TraceEvent::Fault { pc, error: &e });
                Err(e)
            }
        }
    }

    /// Run until halt or fault.
    pub fn run(&mut self, io: &mut Io<'_>) -> Result<Halt, CpuError> {
        loop {
            if let Some(halt) = self.step(io)? {
                return Ok(halt);
            }
        }
    }

    fn cycle(&mut self, io: &mut Io<'_>) -> Result<Option<Halt>, CpuError> {
        // Fetch
        let pc = self.regs.pc;
        let word = self.fetch(pc)?;
        io.trace.event(&TraceEvent::Fetch { pc, word });

        // Decode
        let instr = decode::decode(word)?;

        // Execute
        self.execute(instr, io)?;

        self.cycles += 1;
        self.last_instr = Some(instr);
        io.trace.event(&TraceEvent::Machine { regs: &self.regs, memory: &self.mem });

        if self.regs.is_stopped() {
            return Ok(Some(self.halt(Halt::Stop, io.trace)));
        }

        self.regs.advance_pc();
        if self.regs.pc >= self.mem.len() as i32 {
            return Ok(Some(self.halt(Halt::PcOverflow, io.trace)));
        }

        if self.cycles >= MAX_INSTRUCTIONS {
            return Ok(Some(self.halt(Halt::Timeout, io.trace)));
        }

        Ok(None)
    }

    fn fetch(&self, pc: i32) -> Result<Word, CpuError> {
        let addr = usize::try_from(pc)
            .map_err(|_| MemoryError::NotLoaded { addr: 0, len: self.mem.len() })?;
        Ok(self.mem.read(addr)?)
    }

    fn halt(&mut self, halt: Halt, trace: &mut dyn TraceSink) -> Halt {
        self.state = halt.state();
        trace.event(&TraceEvent::Halt { halt, cycles: self.cycles });
        halt
    }

    /// Execute a decoded instruction.
    fn execute(&mut self, instr: Instruction, io: &mut Io<'_>) -> Result<(), CpuError> {
        io.trace.event(&TraceEvent::Execute { instr });

        match instr {
            // ==================== Arithmetic ====================

            Instruction::Add { target, mode } => {
                let location = self.resolve("ADD FROM", mode, target, io.trace)?;
                let operand = self.load_operand("ADD", location, io.trace)?;
                self.regs.accum = arith::add(self.regs.accum, operand);
            }

            Instruction::Sub { target, mode } => {
                let location = self.resolve("SUB FROM", mode, target, io.trace)?;
                let operand = self.load_operand("SUB", location, io.trace)?;
                self.regs.accum = arith::subtract(self.regs.accum, operand);
            }

            Instruction::And { target, mode } => {
                let location = self.resolve("AND WITH", mode, target, io.trace)?;
                let operand = self.load_operand("AND", location, io.trace)?;
                self.regs.accum = arith::and(self.regs.accum, operand);
            }

            // ==================== Data Transfer ====================

            Instruction::Ld { target, mode } => {
                let location = self.resolve("LOAD FROM", mode, target, io.trace)?;
                self.regs.accum = self.load_operand("LOAD", location, io.trace)?;
            }

            Instruction::Stc { target, mode } => {
                let location = self.resolve("STORE TO", mode, target, io.trace)?;
                let value = Word::new(self.regs.accum);
                self.mem.write(location, value)?;
                io.trace.event(&TraceEvent::Operand { label: "STORE", value });
                self.regs.accum = 0;
            }

            // ==================== Control Flow ====================

            Instruction::Ban { target, mode } => {
                // The operand is only resolved when the branch is taken.
                if arith::is_negative(self.regs.accum) {
                    let location = self.resolve("BRANCH TO", mode, target, io.trace)?;
                    self.regs.jump(location);
                }
            }

            Instruction::Br { target, mode } => {
                let location = self.resolve("BRANCH TO", mode, target, io.trace)?;
                self.regs.jump(location);
            }

            // ==================== I/O ====================

            Instruction::Io(IoOp::Read) => {
                if !io.input.has_next() {
                    return Err(CpuError::InputExhausted);
                }
                let token = io.input.next_token().ok_or(CpuError::InputExhausted)?;
                let hex = HexToken::parse(&token)?;
                io.trace.event(&TraceEvent::Input { token: &hex });
                self.regs.accum = hex.value();
            }

            Instruction::Io(IoOp::Stop) => {
                self.regs.stop();
            }

            Instruction::Io(IoOp::Write) => {
                let line = self.regs.output_line();
                io.trace.event(&TraceEvent::Output { line: &line });
                io.output
                    .write_line(&line)
                    .map_err(|e| CpuError::OutputFailed(e.to_string()))?;
            }
        }

        Ok(())
    }

    fn resolve(
        &self,
        label: &'static str,
        mode: AddrMode,
        target: u16,
        trace: &mut dyn TraceSink,
    ) -> Result<usize, CpuError> {
        let resolved = address::resolve(&self.mem, mode, target)?;
        trace.event(&TraceEvent::Resolve { label, resolved });
        Ok(resolved.location())
    }

    fn load_operand(
        &self,
        label: &'static str,
        location: usize,
        trace: &mut dyn TraceSink,
    ) -> Result<u16, CpuError> {
        let value = self.mem.read(location)?;
        trace.event(&TraceEvent::Operand { label, value });
        Ok(value.value())
    }

    /// Report the current machine state to a trace sink.
    pub fn trace_machine(&self, trace: &mut dyn TraceSink) {
        trace.event(&TraceEvent::Machine { regs: &self.regs, memory: &self.mem });
    }

    /// Render registers and memory as text.
    pub fn dump(&self) -> String {
        trace::render_machine(&self.regs, &self.mem)
    }

    /// The last instruction that ran to completion, if any.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instr
    }

    /// Check if the CPU stopped on STP.
    pub fn is_stopped(&self) -> bool {
        self.state == CpuState::Stopped
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
///
/// Every variant except `NotRunning` ends the run it occurred in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),

    #[error("address out of bounds: {0}")]
    AddressOutOfBounds(#[from] MemoryError),

    #[error("{0}")]
    IllegalOpcode(#[from] DecodeError),

    #[error("read past end of input")]
    InputExhausted,

    #[error("invalid input: {0}")]
    InvalidInputToken(#[from] HexError),

    #[error("output failed: {0}")]
    OutputFailed(String),
}
