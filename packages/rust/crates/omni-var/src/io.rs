//! Source file reading with size and binary checks.
//!
//! Unlike a lossy text loader, invalid UTF-8 is an error here: a rewritten
//! file must keep every untouched byte.

use std::fs;
use std::io::Read;
use std::path::Path;

use memchr::memchr;

use crate::error::RefactorError;

/// Default size limit for a single source file (1MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Bytes inspected for NULs when sniffing binary content.
const BINARY_SNIFF_LEN: usize = 8192;

/// Read a source file for refactoring.
///
/// # Errors
/// `NotFound` when the path has no metadata, `TooLarge` past `max_bytes`,
/// `BinaryFile` when the first 8KB contain a NUL byte, `Encoding` for
/// invalid UTF-8, and `Io` for read failures.
pub fn read_source_file<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, RefactorError> {
    let path = path.as_ref();

    let metadata =
        fs::metadata(path).map_err(|_| RefactorError::NotFound(path.display().to_string()))?;

    if metadata.len() > max_bytes {
        return Err(RefactorError::TooLarge(metadata.len(), max_bytes));
    }

    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
    fs::File::open(path)?.read_to_end(&mut buffer)?;

    decode_source(buffer)
}

/// Validate raw bytes as refactorable text.
///
/// # Errors
/// `BinaryFile` or `Encoding`, as for [`read_source_file`].
pub fn decode_source(buffer: Vec<u8>) -> Result<String, RefactorError> {
    let sniff = &buffer[..buffer.len().min(BINARY_SNIFF_LEN)];
    if memchr(0, sniff).is_some() {
        return Err(RefactorError::BinaryFile);
    }
    String::from_utf8(buffer).map_err(|_| RefactorError::Encoding)
}
