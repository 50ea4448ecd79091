use std::{fs, path::Path};

use log::warn;

use crate::error::LoadError;

const WORD_BITS: usize = 32;

/// Program words read from a text image, one `0`/`1` string per line with the
/// most significant bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedProgram {
    pub words: Vec<u32>,
    /// The image held more instructions than the limit allowed.
    pub truncated: bool,
    /// 1-based numbers of non-blank lines too short to hold a word.
    pub skipped_lines: Vec<usize>,
}

pub fn parse_program(text: &str, max_len: usize) -> Result<LoadedProgram, LoadError> {
    let mut program = LoadedProgram::default();

    for (number, line) in text.lines().enumerate().map(|(i, line)| (i + 1, line.trim_end())) {
        if line.len() < WORD_BITS {
            if !line.is_empty() {
                warn!("line {number}: {:?} is shorter than {WORD_BITS} bits, skipped", line);
                program.skipped_lines.push(number);
            }
            continue;
        }
        if program.words.len() == max_len {
            warn!("program longer than {max_len} instructions, truncated at line {number}");
            program.truncated = true;
            break;
        }
        program.words.push(parse_word(line, number)?);
    }

    Ok(program)
}

fn parse_word(line: &str, number: usize) -> Result<u32, LoadError> {
    line.chars()
        .take(WORD_BITS)
        .enumerate()
        .try_fold(0u32, |word, (column, c)| match c {
            '0' => Ok(word << 1),
            '1' => Ok((word << 1) | 1),
            found => Err(LoadError::InvalidCharacter {
                line: number,
                column: column + 1,
                found,
            }),
        })
}

pub fn load_program_file(path: impl AsRef<Path>, max_len: usize) -> Result<LoadedProgram, LoadError> {
    let text = fs::read_to_string(path)?;
    parse_program(&text, max_len)
}
