//! ASCII executable format for Pullet16 programs.
//!
//! One word per line, written as 16 binary digits:
//! - Only the first whitespace-separated token of a line is read
//! - Blank lines are ignored
//! - Memory address N holds the Nth word, counting from 0

use crate::bits::Word;
use crate::cpu::MAX_MEMORY;
use std::path::Path;
use thiserror::Error;

/// Parse program text into memory words.
pub fn parse_program(source: &str) -> Result<Vec<Word>, LoadError> {
    let mut words = Vec::new();

    for (line_num, line) in source.lines().enumerate() {
        let token = match line.split_whitespace().next() {
            Some(token) => token,
            None => continue,
        };

        let word = Word::parse(token).map_err(|e| LoadError::Parse {
            line: line_num + 1,
            message: e.to_string(),
        })?;
        words.push(word);

        if words.len() > MAX_MEMORY {
            return Err(LoadError::ProgramTooLarge { size: words.len() });
        }
    }

    Ok(words)
}

/// Load a program file from disk.
pub fn load_program<P: AsRef<Path>>(path: P) -> Result<Vec<Word>, LoadError> {
    let source = std::fs::read_to_string(path.as_ref())
        .map_err(|e| LoadError::IoError(format!("{}: {}", path.as_ref().display(), e)))?;
    parse_program(&source)
}

/// Errors that can occur while loading a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("program has more than {max} words (read {size})", max = MAX_MEMORY)]
    ProgramTooLarge { size: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_program() {
        let source = "1010000000000011\n\n1110000000000011   trailing note\n  1110000000000010\n";
        let words = parse_program(source).unwrap();

        assert_eq!(words.len(), 3);
        assert_eq!(words[0].opcode(), 0b101);
        assert_eq!(words[1].target(), 3);
        assert_eq!(words[2].target(), 2);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let source = "1010000000000011\n101000000000001\n";
        match parse_program(source) {
            Err(LoadError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }

        assert!(matches!(
            parse_program("10100000000000z1"),
            Err(LoadError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_program_too_large() {
        let source = "0000000000000000\n".repeat(MAX_MEMORY + 1);
        assert_eq!(
            parse_program(&source).unwrap_err(),
            LoadError::ProgramTooLarge { size: MAX_MEMORY + 1 }
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_program("/nonexistent/pullet16/program.txt"),
            Err(LoadError::IoError(_))
        ));
    }
}
