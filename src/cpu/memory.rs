//! Pullet16 memory subsystem.
//!
//! Memory holds as many words as the loaded program supplies, up to
//! [`MAX_MEMORY`]. There is no zero-filled backing store beyond that.

use crate::bits::Word;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Address limit used by the range check.
///
/// The check is inclusive (`addr <= MAX_MEMORY`), so 4096 itself passes
/// even though the highest cell index is 4095. Such an address is then
/// rejected by [`Memory::read`]/[`Memory::write`] as not loaded.
pub const MAX_MEMORY: usize = 4096;

/// Pullet16 memory: the words of the loaded program.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    /// Create an empty memory.
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Replace memory contents with a program image.
    pub fn load_program(&mut self, program: &[Word]) -> Result<(), MemoryError> {
        if program.len() > MAX_MEMORY {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                available: MAX_MEMORY,
            });
        }
        self.cells = program.to_vec();
        Ok(())
    }

    /// Number of loaded words.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if nothing is loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Range-check an address against the machine limit.
    pub fn check_bounds(addr: u32) -> Result<usize, MemoryError> {
        if addr as usize > MAX_MEMORY {
            return Err(MemoryError::OutOfBounds(addr));
        }
        Ok(addr as usize)
    }

    /// Read a word.
    #[inline]
    pub fn read(&self, addr: usize) -> Result<Word, MemoryError> {
        self.cells
            .get(addr)
            .copied()
            .ok_or(MemoryError::NotLoaded { addr, len: self.cells.len() })
    }

    /// Write a word.
    #[inline]
    pub fn write(&mut self, addr: usize, value: Word) -> Result<(), MemoryError> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(addr)
            .ok_or(MemoryError::NotLoaded { addr, len })?;
        *cell = value;
        Ok(())
    }

    /// All loaded words in address order.
    pub fn words(&self) -> &[Word] {
        &self.cells
    }

    /// Dump memory contents (for debugging).
    pub fn dump(&self, start: usize, count: usize) -> Vec<(usize, Word)> {
        let end = start.saturating_add(count).min(self.cells.len());
        (start.min(end)..end).map(|i| (i, self.cells[i])).collect()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_zero = self.cells.iter().filter(|w| w.value() != 0).count();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("loaded_cells", &self.cells.len())
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("address {0} is out of bounds (0-{max})", max = MAX_MEMORY)]
    OutOfBounds(u32),

    #[error("address {addr} is beyond the {len} loaded words")]
    NotLoaded { addr: usize, len: usize },

    #[error("program size {size} exceeds available space {available}")]
    ProgramTooLarge { size: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(n: usize) -> Memory {
        let mut mem = Memory::new();
        let program: Vec<Word> = (0..n).map(|i| Word::new(i as u16)).collect();
        mem.load_program(&program).unwrap();
        mem
    }

    #[test]
    fn test_memory_read_write() {
        let mut mem = loaded(8);
        mem.write(3, Word::new(42)).unwrap();
        assert_eq!(mem.read(3).unwrap().value(), 42);
        assert_eq!(mem.len(), 8);
    }

    #[test]
    fn test_bounds_check_is_inclusive() {
        assert_eq!(Memory::check_bounds(0).unwrap(), 0);
        assert_eq!(Memory::check_bounds(4095).unwrap(), 4095);
        assert_eq!(Memory::check_bounds(4096).unwrap(), 4096);
        assert_eq!(Memory::check_bounds(4097).unwrap_err(), MemoryError::OutOfBounds(4097));
    }

    #[test]
    fn test_access_past_loaded_length() {
        let mut mem = loaded(4);
        assert_eq!(
            mem.read(4).unwrap_err(),
            MemoryError::NotLoaded { addr: 4, len: 4 }
        );
        assert!(mem.write(4096, Word::zero()).is_err());
    }

    #[test]
    fn test_load_program_limit() {
        let mut mem = Memory::new();
        let program = vec![Word::zero(); MAX_MEMORY + 1];
        assert_eq!(
            mem.load_program(&program).unwrap_err(),
            MemoryError::ProgramTooLarge { size: 4097, available: 4096 }
        );
        assert!(mem.load_program(&program[..MAX_MEMORY]).is_ok());
    }

    #[test]
    fn test_dump_clamps() {
        let mem = loaded(3);
        assert_eq!(mem.dump(1, 10), vec![(1, Word::new(1)), (2, Word::new(2))]);
        assert!(mem.dump(5, 2).is_empty());
    }
}
