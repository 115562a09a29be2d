//! Execution trace events and sinks.
//!
//! The engine reports every fetch, executed instruction and operand
//! resolution to a [`TraceSink`] supplied by the caller. Sinks decide
//! whether to discard, log, write or record the events.

use std::fmt;
use std::io::Write;

use crate::bits::{arith, HexToken, Word};
use crate::cpu::address::Resolved;
use crate::cpu::decode::Instruction;
use crate::cpu::execute::{CpuError, Halt};
use crate::cpu::memory::Memory;
use crate::cpu::registers::Registers;
use crate::image::disasm;

/// One step of the execution trace.
#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'a> {
    /// An instruction word was fetched at `pc`.
    Fetch { pc: i32, word: Word },
    /// A decoded instruction is about to execute.
    Execute { instr: Instruction },
    /// An operand location was computed.
    Resolve { label: &'static str, resolved: Resolved },
    /// A memory value was read or stored.
    Operand { label: &'static str, value: Word },
    /// `RD` consumed an input token.
    Input { token: &'a HexToken },
    /// A `WRT` line was emitted.
    Output { line: &'a str },
    /// Machine state after an instruction (or after loading).
    Machine { regs: &'a Registers, memory: &'a Memory },
    /// Execution halted normally.
    Halt { halt: Halt, cycles: u64 },
    /// Execution stopped on a fault.
    Fault { pc: i32, error: &'a CpuError },
}

/// Discriminant of a [`TraceEvent`], for filtering and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceKind {
    Fetch,
    Execute,
    Resolve,
    Operand,
    Input,
    Output,
    Machine,
    Halt,
    Fault,
}

impl TraceEvent<'_> {
    /// The kind of this event.
    pub fn kind(&self) -> TraceKind {
        match self {
            TraceEvent::Fetch { .. } => TraceKind::Fetch,
            TraceEvent::Execute { .. } => TraceKind::Execute,
            TraceEvent::Resolve { .. } => TraceKind::Resolve,
            TraceEvent::Operand { .. } => TraceKind::Operand,
            TraceEvent::Input { .. } => TraceKind::Input,
            TraceEvent::Output { .. } => TraceKind::Output,
            TraceEvent::Machine { .. } => TraceKind::Machine,
            TraceEvent::Halt { .. } => TraceKind::Halt,
            TraceEvent::Fault { .. } => TraceKind::Fault,
        }
    }
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Fetch { pc, word } => write!(
                f,
                "INTERPRET: PC OPCODE ADDR TARGET {:>6} {} {} {}",
                pc,
                word.opcode_bits(),
                word.mode_bit(),
                word.target_bits()
            ),
            TraceEvent::Execute { instr } => {
                write!(f, "EXECUTE: {}", disasm::format_instruction(instr))
            }
            TraceEvent::Resolve { label, resolved } => {
                write!(f, "{} LOCATION {}", label, resolved.target)?;
                if let Some(indirect) = resolved.indirect {
                    write!(f, "\n{} INDIRECT {}", label, indirect)?;
                }
                Ok(())
            }
            TraceEvent::Operand { label, value } => write!(
                f,
                "{} VALUE {} {}",
                label,
                value,
                arith::to_signed16(value.value())
            ),
            TraceEvent::Input { token } => write!(
                f,
                "READ INPUT {} {} {}",
                token.text(),
                Word::new(token.value()),
                arith::to_signed16(token.value())
            ),
            TraceEvent::Output { line } => write!(f, "WRITE OUTPUT {}", line),
            TraceEvent::Machine { regs, memory } => {
                write!(f, "MACHINE IS NOW\n{}", render_machine(regs, memory))
            }
            TraceEvent::Halt { halt, cycles } => match halt {
                Halt::Stop => write!(f, "PROGRAM STOPPED AFTER {} INSTRUCTIONS", cycles),
                Halt::PcOverflow => write!(f, "***** ERROR -- PC BEYOND MEMORY BOUND"),
                Halt::Timeout => write!(f, "PROGRAM TIMED OUT AFTER {} INSTRUCTIONS", cycles),
            },
            TraceEvent::Fault { pc, error } => write!(
                f,
                "***** ERROR -- {} AT PC {}\nPROGRAM TERMINATING",
                error, pc
            ),
        }
    }
}

/// Render registers and memory, four words per row.
pub fn render_machine(regs: &Registers, memory: &Memory) -> String {
    let mut s = String::new();
    s.push_str(&format!("PC    {:>8}\n", regs.pc));
    s.push_str(&format!(
        "ACCUM {:>8} {}\n\n",
        regs.accum_signed(),
        regs.accum_bits()
    ));

    for (row, chunk) in memory.words().chunks(4).enumerate() {
        let start = row * 4;
        s.push_str(&format!("MEM {:>4}-{:>4}", start, start + 3));
        for word in chunk {
            s.push(' ');
            s.push_str(&word.to_bits());
        }
        s.push('\n');
    }

    s
}

/// Receiver of trace events.
pub trait TraceSink {
    /// Handle one event.
    fn event(&mut self, event: &TraceEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn event(&mut self, _event: &TraceEvent<'_>) {}
}

/// Forwards events to the `log` facade.
///
/// Machine dumps go to `trace`, everything else to `debug`; faults
/// are reported at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn event(&mut self, event: &TraceEvent<'_>) {
        match event.kind() {
            TraceKind::Machine => log::trace!("{}", event),
            TraceKind::Fault => log::warn!("{}", event),
            _ => log::debug!("{}", event),
        }
    }
}

/// Writes rendered events to any [`Write`] implementor, one blank line
/// after each machine dump.
///
/// The trace is diagnostic: a failed write is logged once and later
/// events are dropped.
#[derive(Debug)]
pub struct WriterTrace<W: Write> {
    writer: W,
    failed: bool,
}

impl<W: Write> WriterTrace<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, failed: false }
    }

    /// True if a write has failed.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for WriterTrace<W> {
    fn event(&mut self, event: &TraceEvent<'_>) {
        if self.failed {
            return;
        }
        let result = match event.kind() {
            TraceKind::Machine => writeln!(self.writer, "{}\n", event),
            _ => writeln!(self.writer, "{}", event),
        };
        if let Err(e) = result {
            log::warn!("trace output disabled: {}", e);
            self.failed = true;
        }
    }
}

/// Keeps every event as rendered text.
#[derive(Debug, Default, Clone)]
pub struct RecordingTrace {
    records: Vec<(TraceKind, String)>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in arrival order.
    pub fn records(&self) -> &[(TraceKind, String)] {
        &self.records
    }

    /// Event kinds in arrival order.
    pub fn kinds(&self) -> Vec<TraceKind> {
        self.records.iter().map(|(kind, _)| *kind).collect()
    }

    /// Rendered lines of one kind.
    pub fn lines_of(&self, kind: TraceKind) -> Vec<&str> {
        self.records
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, line)| line.as_str())
            .collect()
    }
}

impl TraceSink for RecordingTrace {
    fn event(&mut self, event: &TraceEvent<'_>) {
        self.records.push((event.kind(), event.to_string()));
    }
}
