//! Instruction decoder for the Pullet16.
//!
//! Every 16-bit word decodes into a 3-bit opcode, a 1-bit address mode
//! and a 12-bit target. Opcode `111` is the I/O family: its target is a
//! selector, not an address.

use crate::bits::Word;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Address mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddrMode {
    /// Target is the effective location (flag = 0)
    Direct,
    /// Target names a cell holding the effective location (flag = 1)
    Indirect,
}

impl AddrMode {
    /// Create from the mode bit. Any nonzero bit means indirect.
    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            AddrMode::Direct
        } else {
            AddrMode::Indirect
        }
    }

    /// Convert to the mode bit.
    pub fn to_bit(self) -> u8 {
        match self {
            AddrMode::Direct => 0,
            AddrMode::Indirect => 1,
        }
    }
}

/// The eight base opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Ban,
    Sub,
    Stc,
    And,
    Add,
    Ld,
    Br,
    Io,
}

impl Opcode {
    /// Decode a 3-bit field.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Opcode::Ban,
            0b001 => Opcode::Sub,
            0b010 => Opcode::Stc,
            0b011 => Opcode::And,
            0b100 => Opcode::Add,
            0b101 => Opcode::Ld,
            0b110 => Opcode::Br,
            0b111 => Opcode::Io,
            _ => unreachable!("opcode field is masked to three bits"),
        }
    }

    /// The 3-bit field value.
    pub fn to_bits(self) -> u8 {
        match self {
            Opcode::Ban => 0b000,
            Opcode::Sub => 0b001,
            Opcode::Stc => 0b010,
            Opcode::And => 0b011,
            Opcode::Add => 0b100,
            Opcode::Ld => 0b101,
            Opcode::Br => 0b110,
            Opcode::Io => 0b111,
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Ban => "BAN",
            Opcode::Sub => "SUB",
            Opcode::Stc => "STC",
            Opcode::And => "AND",
            Opcode::Add => "ADD",
            Opcode::Ld => "LD",
            Opcode::Br => "BR",
            Opcode::Io => "IO",
        }
    }
}

/// Operations selected by the target of opcode `111`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IoOp {
    /// Read one input token into the accumulator (selector 1)
    Read,
    /// Stop execution (selector 2)
    Stop,
    /// Write the accumulator to output (selector 3)
    Write,
}

impl IoOp {
    const READ: u16 = 0b0000_0000_0001;
    const STOP: u16 = 0b0000_0000_0010;
    const WRITE: u16 = 0b0000_0000_0011;

    /// Look up a selector value.
    pub fn from_selector(selector: u16) -> Option<Self> {
        match selector {
            Self::READ => Some(IoOp::Read),
            Self::STOP => Some(IoOp::Stop),
            Self::WRITE => Some(IoOp::Write),
            _ => None,
        }
    }

    /// The 12-bit selector value.
    pub fn selector(self) -> u16 {
        match self {
            IoOp::Read => Self::READ,
            IoOp::Stop => Self::STOP,
            IoOp::Write => Self::WRITE,
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            IoOp::Read => "RD",
            IoOp::Stop => "STP",
            IoOp::Write => "WRT",
        }
    }
}

/// Decoded Pullet16 instruction.
///
/// - Arithmetic: SUB, AND, ADD
/// - Transfer: LD, STC
/// - Control: BAN, BR, STP
/// - I/O: RD, WRT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Branch if accumulator negative: if ACCUM < 0 then PC := target
    Ban { target: u16, mode: AddrMode },

    /// Subtract: ACCUM := ACCUM - [target]
    Sub { target: u16, mode: AddrMode },

    /// Store and clear: [target] := ACCUM, ACCUM := 0
    Stc { target: u16, mode: AddrMode },

    /// Bitwise and: ACCUM := ACCUM & [target]
    And { target: u16, mode: AddrMode },

    /// Add: ACCUM := ACCUM + [target]
    Add { target: u16, mode: AddrMode },

    /// Load: ACCUM := [target]
    Ld { target: u16, mode: AddrMode },

    /// Unconditional branch: PC := target
    Br { target: u16, mode: AddrMode },

    /// Extended I/O family (opcode `111`)
    Io(IoOp),
}

impl Instruction {
    /// The base opcode of this instruction.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Ban { .. } => Opcode::Ban,
            Instruction::Sub { .. } => Opcode::Sub,
            Instruction::Stc { .. } => Opcode::Stc,
            Instruction::And { .. } => Opcode::And,
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Ld { .. } => Opcode::Ld,
            Instruction::Br { .. } => Opcode::Br,
            Instruction::Io(_) => Opcode::Io,
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Io(op) => op.mnemonic(),
            other => other.opcode().mnemonic(),
        }
    }

    /// Target and mode for instructions that address memory.
    pub fn operand(&self) -> Option<(u16, AddrMode)> {
        match *self {
            Instruction::Ban { target, mode }
            | Instruction::Sub { target, mode }
            | Instruction::Stc { target, mode }
            | Instruction::And { target, mode }
            | Instruction::Add { target, mode }
            | Instruction::Ld { target, mode }
            | Instruction::Br { target, mode } => Some((target, mode)),
            Instruction::Io(_) => None,
        }
    }
}

/// Decode a 16-bit instruction word.
pub fn decode(word: Word) -> Result<Instruction, DecodeError> {
    let target = word.target();
    let mode = AddrMode::from_bit(word.mode_bit());

    let instruction = match Opcode::from_bits(word.opcode()) {
        Opcode::Ban => Instruction::Ban { target, mode },
        Opcode::Sub => Instruction::Sub { target, mode },
        Opcode::Stc => Instruction::Stc { target, mode },
        Opcode::And => Instruction::And { target, mode },
        Opcode::Add => Instruction::Add { target, mode },
        Opcode::Ld => Instruction::Ld { target, mode },
        Opcode::Br => Instruction::Br { target, mode },
        Opcode::Io => match IoOp::from_selector(target) {
            Some(op) => Instruction::Io(op),
            None => {
                return Err(DecodeError::IllegalOpcode {
                    opcode: word.opcode(),
                    target,
                })
            }
        },
    };

    Ok(instruction)
}

/// Encode an instruction back to a 16-bit word.
///
/// I/O instructions are encoded with a direct mode flag.
pub fn encode(instr: &Instruction) -> Word {
    if let Instruction::Io(op) = instr {
        return Word::from_fields(Opcode::Io.to_bits(), 0, op.selector());
    }
    let (target, mode) = instr.operand().unwrap_or((0, AddrMode::Direct));
    Word::from_fields(instr.opcode().to_bits(), mode.to_bit(), target)
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("illegal opcode {opcode:03b} and target {target:012b}")]
    IllegalOpcode { opcode: u8, target: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stop() {
        let word = Word::parse("1110000000000010").unwrap();
        assert_eq!(decode(word).unwrap(), Instruction::Io(IoOp::Stop));
    }

    #[test]
    fn test_decode_fields() {
        let word = Word::parse("1011000000001100").unwrap();
        assert_eq!(
            decode(word).unwrap(),
            Instruction::Ld { target: 12, mode: AddrMode::Indirect }
        );

        let word = Word::parse("0000111111111111").unwrap();
        assert_eq!(
            decode(word).unwrap(),
            Instruction::Ban { target: 4095, mode: AddrMode::Direct }
        );
    }

    #[test]
    fn test_io_ignores_mode_flag() {
        let word = Word::parse("1111000000000011").unwrap();
        assert_eq!(decode(word).unwrap(), Instruction::Io(IoOp::Write));
    }

    #[test]
    fn test_illegal_selectors() {
        for selector in [0u16, 4, 0x0FFF] {
            let word = Word::from_fields(0b111, 0, selector);
            assert_eq!(
                decode(word).unwrap_err(),
                DecodeError::IllegalOpcode { opcode: 0b111, target: selector }
            );
        }
    }

    #[test]
    fn test_opcode_bits_roundtrip() {
        for bits in 0u8..8 {
            assert_eq!(Opcode::from_bits(bits).to_bits(), bits);
        }
    }

    #[test]
    fn test_addr_mode_roundtrip() {
        for mode in [AddrMode::Direct, AddrMode::Indirect] {
            assert_eq!(AddrMode::from_bit(mode.to_bit()), mode);
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let test_cases = [
            Instruction::Io(IoOp::Read),
            Instruction::Io(IoOp::Stop),
            Instruction::Io(IoOp::Write),
            Instruction::Add { target: 10, mode: AddrMode::Direct },
            Instruction::Stc { target: 4095, mode: AddrMode::Indirect },
            Instruction::Br { target: 0, mode: AddrMode::Direct },
        ];

        for instr in test_cases {
            assert_eq!(decode(encode(&instr)).unwrap(), instr);
        }
    }
}
