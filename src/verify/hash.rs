//! Hashing a bounded prefix of a path.

use super::digest::Digest;
use crate::error::{Error, Result, Side};
use sha2::{Digest as _, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Compute the SHA-256 of the first `limit` bytes of `path`.
///
/// Bytes past `limit` are never read, so a device larger than the image
/// written to it hashes the same as the image. A `limit` of zero yields the
/// digest of the empty input.
///
/// # Errors
///
/// - [`Error::SourceOpen`] / [`Error::TargetOpen`] (chosen by `side`) if
///   the path cannot be opened
/// - [`Error::HashRead`] if reading fails
/// - [`Error::ShortRead`] if the path ends before `limit` bytes
/// - [`Error::InvalidBufferSize`] if `buffer_size` is zero
pub fn hash_prefix(path: &Path, side: Side, limit: u64, buffer_size: usize) -> Result<Digest> {
    if buffer_size == 0 {
        return Err(Error::InvalidBufferSize(buffer_size));
    }

    let file = File::open(path).map_err(|source| match side {
        Side::Source => Error::SourceOpen {
            path: path.to_path_buf(),
            source,
        },
        Side::Target => Error::TargetOpen {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let mut reader = file.take(limit);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; buffer_size];
    let mut hashed: u64 = 0;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(Error::HashRead {
                    path: path.to_path_buf(),
                    hashed,
                    source,
                });
            }
        };
        hasher.update(&buffer[..n]);
        hashed += n as u64;
    }

    if hashed < limit {
        return Err(Error::ShortRead {
            path: path.to_path_buf(),
            limit,
            available: hashed,
        });
    }

    Ok(Digest::from_bytes(hasher.finalize().into()))
}
