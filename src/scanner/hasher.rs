//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] reads a file through a fixed-size buffer and feeds each chunk
//! to BLAKE3, so peak memory stays bounded by the buffer no matter how large
//! the file is. Byte-identical files always produce the same [`Digest`].
//!
//! # Example
//!
//! ```no_run
//! use pdfdupe::scanner::{digest_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.hash(Path::new("report.pdf")).unwrap();
//! println!("{}", digest_to_hex(&digest));
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::HashError;

/// A 256-bit BLAKE3 content digest.
pub type Digest = [u8; 32];

/// Default read buffer: 64 KiB.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher using [`DEFAULT_BUFFER_SIZE`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the read buffer size. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// The configured read buffer size in bytes.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Hash the full content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// part-way through (permission, I/O error, file removed mid-read).
    pub fn hash(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let digest = self.hash_reader(file).map_err(|e| HashError::from_io(path, e))?;
        log::trace!("Hashed {}: {}", path.display(), digest_to_hex(&digest));
        Ok(digest)
    }

    /// Hash everything a reader yields, one buffer at a time.
    ///
    /// # Errors
    ///
    /// Propagates the first non-`Interrupted` read error.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> std::io::Result<Digest> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(*hasher.finalize().as_bytes())
    }
}

/// Render a digest as lowercase hexadecimal (64 characters).
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    use std::fmt::Write;

    digest.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
