use crate::{
    constant::{COMMAND_HEADER_WORDS, INPUT_EXTENSION_CHARS, LISTING_SUFFIX, UPLOAD_COMMAND},
    data::{AssemblyError, AssemblyErrorCode},
    very_very_verbose_println,
};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

/// Splits every word into its 32-bit halves, low half first.
pub fn half_words(words: &[u64]) -> Vec<u32> {
    let mut halves = Vec::with_capacity(words.len() * 2);
    for word in words {
        let low = *word as u32;
        let high = (*word >> 32) as u32;
        very_very_verbose_println!("{word:#018x} -> low {low:#010x} high {high:#010x}");
        halves.push(low);
        halves.push(high);
    }
    halves
}

pub fn to_bytes(halves: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(halves.len() * size_of::<u32>());
    for half in halves {
        bytes.extend_from_slice(&half.to_le_bytes());
    }
    bytes
}

/// The byte stream loaded into sequencer memory, 8 bytes per word.
pub fn serialize(words: &[u64]) -> Vec<u8> {
    to_bytes(&half_words(words))
}

/// Readable dump of the half-word stream, one word per block:
///
/// ```text
/// A[0x0]	pulseq_memory[0] = 0x11
/// 	pulseq_memory[1] = 0x0
/// ```
pub fn render_listing(halves: &[u32]) -> String {
    let mut listing = String::new();
    for (idx, half) in halves.iter().enumerate() {
        if idx % 2 == 1 {
            listing.push_str(&format!("\tpulseq_memory[{idx}] = {half:#x}\n\n"));
        } else {
            listing.push_str(&format!(
                "A[{:#x}]\tpulseq_memory[{idx}] = {half:#x} \n",
                idx / 2
            ));
        }
    }
    listing
}

/// `<input minus its 4 character extension>_hex.txt`
pub fn listing_path(input: &Path) -> PathBuf {
    sibling_path(input, LISTING_SUFFIX)
}

pub fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let input = input.to_string_lossy();
    let keep = input.chars().count().saturating_sub(INPUT_EXTENSION_CHARS);
    let mut path: String = input.chars().take(keep).collect();
    path.push_str(suffix);
    PathBuf::from(path)
}

/// Prefixes a program with the sequence upload command header.
pub fn package(program: &[u8]) -> Vec<u8> {
    let mut image =
        Vec::<u8>::with_capacity(COMMAND_HEADER_WORDS * size_of::<u32>() + program.len());
    image.extend(UPLOAD_COMMAND.to_le_bytes());
    for _ in 1..COMMAND_HEADER_WORDS {
        image.extend(0u32.to_le_bytes());
    }
    image.extend_from_slice(program);
    image
}

/// Refuses an output path that names the input file itself.
pub fn ensure_not_overwriting(input: &Path, output: &Path) -> Result<(), AssemblyError> {
    let same = input == output
        || matches!(
            (fs::canonicalize(input), fs::canonicalize(output)),
            (Ok(a), Ok(b)) if a == b
        );
    if same {
        return Err(AssemblyError::new(
            AssemblyErrorCode::OutputWriteError,
            format!(
                "output file {} would overwrite {}",
                output.display(),
                input.display()
            ),
        ));
    }
    Ok(())
}

pub fn write_file(image: &[u8], output_file: &Path) -> Result<(), AssemblyError> {
    let mut outf = match File::create(output_file) {
        Ok(f) => f,
        Err(err) => {
            return Err(AssemblyError::new(
                AssemblyErrorCode::OutputWriteError,
                format!("error opening file {} :: {err}", output_file.display()),
            ))
        }
    };
    match outf.write_all(image) {
        Ok(()) => Ok(()),
        Err(err) => Err(AssemblyError::new(
            AssemblyErrorCode::OutputWriteError,
            format!("error writing to file {} :: {err}", output_file.display()),
        )),
    }
}
