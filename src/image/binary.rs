//! Binary memory images.
//!
//! An image is the loaded memory written as consecutive 16-bit
//! little-endian words, with no header. Reading it back must reproduce
//! the ASCII program exactly; [`verify_image`] checks that.

use crate::bits::Word;
use std::path::Path;
use thiserror::Error;

/// Serialize words to image bytes.
pub fn to_bytes(words: &[Word]) -> Vec<u8> {
    words
        .iter()
        .flat_map(|w| w.value().to_le_bytes())
        .collect()
}

/// Deserialize image bytes to words.
pub fn from_bytes(bytes: &[u8]) -> Result<Vec<Word>, ImageError> {
    if bytes.len() % 2 != 0 {
        return Err(ImageError::OddLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| Word::new(u16::from_le_bytes([pair[0], pair[1]])))
        .collect())
}

/// Write an image file.
pub fn save_image<P: AsRef<Path>>(path: P, words: &[Word]) -> Result<(), ImageError> {
    std::fs::write(path.as_ref(), to_bytes(words)).map_err(|e| ImageError::IoError(e.to_string()))
}

/// Read an image file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Vec<Word>, ImageError> {
    let bytes = std::fs::read(path.as_ref()).map_err(|e| ImageError::IoError(e.to_string()))?;
    from_bytes(&bytes)
}

/// Re-read an image file and compare it against `expected`.
pub fn verify_image<P: AsRef<Path>>(path: P, expected: &[Word]) -> Result<(), ImageError> {
    let actual = load_image(path)?;
    check_words(&actual, expected)
}

fn check_words(actual: &[Word], expected: &[Word]) -> Result<(), ImageError> {
    if let Some(addr) = actual.iter().zip(expected).position(|(a, e)| a != e) {
        return Err(ImageError::Mismatch {
            addr,
            expected: expected[addr],
            found: actual[addr],
        });
    }
    if actual.len() != expected.len() {
        return Err(ImageError::LengthMismatch {
            expected: expected.len(),
            found: actual.len(),
        });
    }
    Ok(())
}

/// Errors that can occur while handling binary images.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("image has odd length {0}")]
    OddLength(usize),

    #[error("image word {addr} is {found}, expected {expected}")]
    Mismatch { addr: usize, expected: Word, found: Word },

    #[error("image holds {found} words, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_layout() {
        let words = [Word::new(0xE002), Word::new(0x0001)];
        assert_eq!(to_bytes(&words), vec![0x02, 0xE0, 0x01, 0x00]);
        assert_eq!(from_bytes(&[0x02, 0xE0, 0x01, 0x00]).unwrap(), words.to_vec());
    }

    #[test]
    fn test_odd_length_rejected() {
        assert_eq!(from_bytes(&[1, 2, 3]).unwrap_err(), ImageError::OddLength(3));
    }

    #[test]
    fn test_check_words() {
        let expected = [Word::new(1), Word::new(2)];
        assert!(check_words(&expected, &expected).is_ok());
        assert_eq!(
            check_words(&[Word::new(1), Word::new(3)], &expected).unwrap_err(),
            ImageError::Mismatch { addr: 1, expected: Word::new(2), found: Word::new(3) }
        );
        assert_eq!(
            check_words(&[Word::new(1)], &expected).unwrap_err(),
            ImageError::LengthMismatch { expected: 2, found: 1 }
        );
    }

    #[test]
    fn test_save_and_verify() {
        let path = std::env::temp_dir().join(format!("pullet16-image-{}.bin", std::process::id()));
        let words = [Word::new(0xA003), Word::new(0xE003), Word::new(0xE002)];

        save_image(&path, &words).unwrap();
        let verified = verify_image(&path, &words);
        let _ = std::fs::remove_file(&path);

        assert_eq!(verified, Ok(()));
    }
}
