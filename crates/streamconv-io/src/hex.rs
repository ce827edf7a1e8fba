use std::{fmt::Write as _, fs, path::Path};

use streamconv_core::Word;

use crate::error::IoError;

/// Parse a word dump with one hexadecimal word per line.
///
/// Lines may carry an optional `0x` / `0X` prefix; blank lines are skipped.
pub fn decode_hex_words(text: &str) -> Result<Vec<Word>, IoError> {
    let mut words = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let digits = line
            .strip_prefix("0x")
            .or_else(|| line.strip_prefix("0X"))
            .unwrap_or(line);
        let word = Word::from_str_radix(digits, 16).map_err(|_| IoError::InvalidWord {
            line: i + 1,
            text: line.to_string(),
        })?;
        words.push(word);
    }
    Ok(words)
}

/// Format words as eight upper-case hexadecimal digits per line.
pub fn encode_hex_words(words: &[Word]) -> String {
    let mut text = String::with_capacity(words.len() * 9);
    for word in words {
        // writing into a String cannot fail
        let _ = writeln!(text, "{word:08X}");
    }
    text
}

/// Read a word dump from a text file.
///
/// # Arguments
///
/// * `file_path` - The path to the dump.
///
/// # Returns
///
/// The words in file order.
pub fn read_hex_words(file_path: impl AsRef<Path>) -> Result<Vec<Word>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    let text = fs::read_to_string(file_path)?;
    let words = decode_hex_words(&text)?;
    log::debug!("read {} words from {}", words.len(), file_path.display());
    Ok(words)
}

/// Write a word dump to a text file.
///
/// # Arguments
///
/// * `file_path` - The path to the dump.
/// * `words` - The words to write.
pub fn write_hex_words(file_path: impl AsRef<Path>, words: &[Word]) -> Result<(), IoError> {
    fs::write(file_path, encode_hex_words(words))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_dump() -> Result<(), IoError> {
        let words = decode_hex_words("0000007F\n0x000000ff\n\n  FFFFFFDD  \n")?;
        assert_eq!(words, vec![0x7f, 0xff, 0xffff_ffdd]);
        Ok(())
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_hex_words("00000001\nzz\n");
        assert!(matches!(err, Err(IoError::InvalidWord { line: 2, .. })));
    }

    #[test]
    fn encode_dump() {
        assert_eq!(encode_hex_words(&[0x7f, 0xffff_ffdd]), "0000007F\nFFFFFFDD\n");
    }

    #[test]
    fn read_write_dump() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("ram.txt");

        let words = (0..16).map(|x| x * 0x0101_0101).collect::<Vec<Word>>();
        write_hex_words(&file_path, &words)?;
        assert_eq!(read_hex_words(&file_path)?, words);

        let missing = tmp_dir.path().join("missing.txt");
        assert!(matches!(
            read_hex_words(missing),
            Err(IoError::FileDoesNotExist(_))
        ));
        Ok(())
    }
}
