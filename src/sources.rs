//! Source Files - whole-file text reads with an encoding fallback

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

/// Read a text file into memory.
///
/// Returns `Ok(None)` when the file does not exist. Content that is not valid
/// UTF-8 is decoded as Latin-1, which maps every byte to a character.
pub fn read_source(path: &Path) -> std::io::Result<Option<String>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(err) => {
            warn!(path = %path.display(), "failed to decode as UTF-8, falling back to Latin-1");
            Ok(Some(decode_latin1(err.as_bytes())))
        }
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
