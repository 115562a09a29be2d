//! Input and output collaborators for `RD` and `WRT`.

use std::collections::VecDeque;
use std::io::{self, Write};

use crate::cpu::trace::TraceSink;

/// Supplies whitespace-separated tokens to the `RD` instruction.
pub trait InputSource {
    /// True if another token is available.
    fn has_next(&self) -> bool;

    /// Take the next token.
    fn next_token(&mut self) -> Option<String>;
}

impl InputSource for VecDeque<String> {
    fn has_next(&self) -> bool {
        !self.is_empty()
    }

    fn next_token(&mut self) -> Option<String> {
        self.pop_front()
    }
}

/// Tokens split out of a block of text.
#[derive(Debug, Default, Clone)]
pub struct TokenInput {
    tokens: VecDeque<String>,
}

impl TokenInput {
    pub fn from_text(text: &str) -> Self {
        Self {
            tokens: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

impl InputSource for TokenInput {
    fn has_next(&self) -> bool {
        self.tokens.has_next()
    }

    fn next_token(&mut self) -> Option<String> {
        self.tokens.next_token()
    }
}

/// Receives one formatted line per `WRT`.
pub trait OutputSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl OutputSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes output lines to any [`Write`] implementor, flushing after each.
#[derive(Debug)]
pub struct LineWriter<W: Write> {
    writer: W,
}

impl<W: Write> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for LineWriter<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}

/// The collaborators a running program talks to.
pub struct Io<'a> {
    pub input: &'a mut dyn InputSource,
    pub output: &'a mut dyn OutputSink,
    pub trace: &'a mut dyn TraceSink,
}

impl<'a> Io<'a> {
    pub fn new(
        input: &'a mut dyn InputSource,
        output: &'a mut dyn OutputSink,
        trace: &'a mut dyn TraceSink,
    ) -> Self {
        Self { input, output, trace }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_input() {
        let mut input = TokenInput::from_text("+0001\n  -0002\t7FFF\n");
        assert_eq!(input.remaining(), 3);
        assert!(input.has_next());
        assert_eq!(input.next_token().as_deref(), Some("+0001"));
        assert_eq!(input.next_token().as_deref(), Some("-0002"));
        assert_eq!(input.next_token().as_deref(), Some("7FFF"));
        assert!(!input.has_next());
        assert_eq!(input.next_token(), None);
    }

    #[test]
    fn test_line_writer() {
        let mut out = LineWriter::new(Vec::new());
        out.write_line("       5 0000000000000101").unwrap();
        out.write_line("      -1 1111111111111111").unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(text, "       5 0000000000000101\n      -1 1111111111111111\n");
    }
}
