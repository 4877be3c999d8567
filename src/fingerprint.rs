//! # Fingerprint Module
//! SHA-256 fingerprints of file content, computed by streaming the file through
//! a `ring` digest context.

use crate::error::{Result, WatchError};
use ring::digest::{Context, Digest, SHA256, SHA256_OUTPUT_LEN};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Size of the read buffer used while hashing.
const CHUNK_SIZE: usize = 8 * 1024;

/// The digest of a file's full byte content at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; SHA256_OUTPUT_LEN]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; SHA256_OUTPUT_LEN] {
        &self.0
    }

    fn from_digest(path: &Path, digest: Digest) -> Result<Self> {
        let bytes = <[u8; SHA256_OUTPUT_LEN]>::try_from(digest.as_ref()).map_err(|_| {
            WatchError::Digest {
                path: path.to_path_buf(),
                message: format!(
                    "expected {} bytes of output, got {}",
                    SHA256_OUTPUT_LEN,
                    digest.as_ref().len()
                ),
            }
        })?;
        Ok(Fingerprint(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Computes the fingerprint of the file at `path`.
///
/// The file is read from start to end in fixed-size chunks, each fed into the
/// digest context, so the whole file is never held in memory.
///
/// # Errors
///
/// * `WatchError::Io` - The file cannot be opened or a read fails.
/// * `WatchError::Digest` - The digest output is not a 32-byte fingerprint.
pub fn poll(path: &Path) -> Result<Fingerprint> {
    let io_err = |source| WatchError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_err)?;
    let mut context = Context::new(&SHA256);
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_err(e)),
        };
        context.update(&buffer[..read]);
    }

    Fingerprint::from_digest(path, context.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const A_SHA256: &str = "ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb";

    #[test]
    fn empty_file_has_the_empty_string_digest() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("empty");
        fs::write(&file, b"").unwrap();

        assert_eq!(poll(&file).unwrap().to_string(), EMPTY_SHA256);
    }

    #[test]
    fn single_byte_matches_published_vector() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"a").unwrap();

        assert_eq!(poll(&file).unwrap().to_string(), A_SHA256);
    }

    #[test]
    fn unchanged_file_polls_to_the_same_fingerprint() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("hello.txt");
        fs::write(&file, b"hello").unwrap();

        assert_eq!(poll(&file).unwrap(), poll(&file).unwrap());
    }

    #[test]
    fn content_spanning_several_chunks_matches_one_shot_digest() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("big.bin");
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        fs::write(&file, &data).unwrap();

        let expected = ring::digest::digest(&SHA256, &data);
        assert_eq!(poll(&file).unwrap().as_bytes().as_slice(), expected.as_ref());
    }

    #[test]
    fn one_changed_byte_changes_the_fingerprint() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("greeting.txt");
        fs::write(&file, b"hello").unwrap();
        let before = poll(&file).unwrap();
        fs::write(&file, b"hallo").unwrap();

        assert_ne!(before, poll(&file).unwrap());
    }

    #[test]
    fn directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = poll(dir.path()).unwrap_err();

        assert!(matches!(err, WatchError::Io { .. }));
        assert!(err.to_string().starts_with("unable to read"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = poll(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, WatchError::Io { .. }));
    }
}
