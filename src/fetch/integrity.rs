use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::RawfetchError;

/// Block size used when hashing files.
pub const HASH_CHUNK_SIZE: usize = 4096;

/// Streaming SHA-256 of a file, as lowercase hex.
pub fn sha256_file(path: &Path) -> Result<String, RawfetchError> {
    let file = File::open(path)?;
    sha256_reader(BufReader::new(file))
}

/// Streaming SHA-256 of any reader, as lowercase hex.
pub fn sha256_reader<R: Read>(mut reader: R) -> Result<String, RawfetchError> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_CHUNK_SIZE];

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Check a file against an expected hex digest.
///
/// The file is left in place on mismatch.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<(), RawfetchError> {
    let actual = sha256_file(path)?;
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(RawfetchError::Integrity {
            path: path.to_path_buf(),
            expected: expected.trim().to_ascii_lowercase(),
            actual,
        })
    }
}
