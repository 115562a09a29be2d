//! Effective address resolution.
//!
//! Direct mode uses the 12-bit target as-is. Indirect mode reads the
//! word stored at the target and uses its value instead. Only one hop
//! is taken; the pointed-to word is never itself treated as a pointer.

use crate::cpu::decode::AddrMode;
use crate::cpu::memory::{Memory, MemoryError};
use serde::{Serialize, Deserialize};

/// Result of resolving an instruction operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved {
    /// The target field as an address.
    pub target: usize,
    /// The address read through the pointer, for indirect operands.
    pub indirect: Option<usize>,
}

impl Resolved {
    /// The effective location.
    pub fn location(&self) -> usize {
        self.indirect.unwrap_or(self.target)
    }
}

/// Compute the effective location for `target` under `mode`.
///
/// Both the target and, for indirect operands, the pointer value are
/// range-checked.
pub fn resolve(mem: &Memory, mode: AddrMode, target: u16) -> Result<Resolved, MemoryError> {
    let direct = Memory::check_bounds(target as u32)?;

    match mode {
        AddrMode::Direct => Ok(Resolved { target: direct, indirect: None }),
        AddrMode::Indirect => {
            let pointer = mem.read(direct)?;
            let location = Memory::check_bounds(pointer.value() as u32)?;
            Ok(Resolved { target: direct, indirect: Some(location) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::Word;

    fn memory(words: &[u16]) -> Memory {
        let mut mem = Memory::new();
        let program: Vec<Word> = words.iter().map(|&w| Word::new(w)).collect();
        mem.load_program(&program).unwrap();
        mem
    }

    #[test]
    fn test_direct() {
        let mem = memory(&[0, 0, 0]);
        let r = resolve(&mem, AddrMode::Direct, 2).unwrap();
        assert_eq!(r.location(), 2);
        assert_eq!(r.indirect, None);
    }

    #[test]
    fn test_direct_does_not_touch_memory() {
        // Range check only; the location need not be loaded yet.
        let mem = memory(&[]);
        assert_eq!(resolve(&mem, AddrMode::Direct, 4095).unwrap().location(), 4095);
    }

    #[test]
    fn test_indirect_single_hop() {
        // Cell 1 points at 3, cell 3 points at 0: only the first hop is taken.
        let mem = memory(&[7, 3, 0, 0]);
        let r = resolve(&mem, AddrMode::Indirect, 1).unwrap();
        assert_eq!(r.target, 1);
        assert_eq!(r.location(), 3);
    }

    #[test]
    fn test_indirect_pointer_out_of_bounds() {
        let mem = memory(&[5000]);
        assert_eq!(
            resolve(&mem, AddrMode::Indirect, 0).unwrap_err(),
            MemoryError::OutOfBounds(5000)
        );
    }

    #[test]
    fn test_indirect_pointer_at_limit_passes_check() {
        let mem = memory(&[4096]);
        assert_eq!(resolve(&mem, AddrMode::Indirect, 0).unwrap().location(), 4096);
    }

    #[test]
    fn test_indirect_through_unloaded_cell() {
        let mem = memory(&[0]);
        assert_eq!(
            resolve(&mem, AddrMode::Indirect, 9).unwrap_err(),
            MemoryError::NotLoaded { addr: 9, len: 1 }
        );
    }
}
