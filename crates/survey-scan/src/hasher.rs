//! Bounded-prefix content hashing.
//!
//! Only the first `len` bytes of a file are read, so large files cost the
//! same as small ones. The digest is SHA-256 rendered as padded standard
//! base64 (44 characters).

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

/// Hash the first `len` bytes of a file.
///
/// Returns `Ok(None)` when `len` is zero. A file shorter than `len` is
/// hashed over the bytes actually present, without padding.
pub fn hash_prefix(path: &Path, len: u64) -> io::Result<Option<String>> {
    if len == 0 {
        return Ok(None);
    }

    let file = File::open(path)?;
    let mut buf = Vec::with_capacity(len.min(64 * 1024) as usize);
    file.take(len).read_to_end(&mut buf)?;

    Ok(Some(digest(&buf)))
}

/// Digest a byte slice.
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    STANDARD.encode(hasher.finalize())
}
