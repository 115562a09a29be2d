//! Program images for the Pullet16.
//!
//! This module provides:
//! - The ASCII executable loader (one 16-digit word per line)
//! - Binary memory images with read-back verification
//! - A disassembler (words → readable text)

pub mod text;
pub mod binary;
pub mod disasm;

pub use text::{load_program, parse_program, LoadError};
pub use binary::{load_image, save_image, verify_image, ImageError};
pub use disasm::{disassemble, disassemble_word, format_instruction};
