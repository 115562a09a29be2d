//! Disassembler for Pullet16 programs.
//!
//! Converts memory words back to readable assembly. Data words are
//! rendered as whatever instruction their bits spell.

use crate::bits::{arith, Word};
use crate::cpu::decode::{decode, AddrMode, Instruction};

/// Disassemble a single word to text.
pub fn disassemble_word(word: Word) -> String {
    match decode(word) {
        Ok(decoded) => format_instruction(&decoded),
        Err(_) => "???".to_string(),
    }
}

/// Disassemble a slice of words, one line per address.
pub fn disassemble(words: &[Word]) -> String {
    let mut output = String::new();
    output.push_str("; Pullet16 Disassembly\n");
    output.push_str("; --------------------\n\n");

    for (addr, word) in words.iter().enumerate() {
        let line = disassemble_word(*word);
        output.push_str(&format!(
            "{:04}: {:<10} ; {} {:>6}\n",
            addr,
            line,
            word,
            arith::to_signed16(word.value())
        ));
    }

    output
}

/// Format a decoded instruction as assembly text.
pub fn format_instruction(instr: &Instruction) -> String {
    match instr.operand() {
        Some((target, AddrMode::Direct)) => format!("{} {}", instr.mnemonic(), target),
        Some((target, AddrMode::Indirect)) => format!("{} *{}", instr.mnemonic(), target),
        None => instr.mnemonic().to_string(),
    }
}
