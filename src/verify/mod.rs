//! Verification engine.
//!
//! Hashes a bounded prefix of the source and of the target concurrently
//! and compares the two digests. Each side is hashed up to its own limit,
//! so a target device larger than the image does not cause a spurious
//! mismatch.
//!
//! A mismatch is a valid result, reported as
//! [`VerificationResult::matches`] being `false`. An `Err` means the outcome
//! could not be determined.

mod digest;
mod hash;

pub use digest::{DIGEST_LEN, Digest};
pub use hash::hash_prefix;

use crate::copy::CopyResult;
use crate::error::{Error, Result, Side};
use crate::options::{CopyOptions, DEFAULT_BUFFER_SIZE};
use std::path::{Path, PathBuf};

/// What to verify: two paths and how many leading bytes of each to hash.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerificationRequest {
    /// Path that was read from
    pub source_path: PathBuf,
    /// Path that was written to
    pub target_path: PathBuf,
    /// Number of leading source bytes to hash
    pub source_limit: u64,
    /// Number of leading target bytes to hash
    pub target_limit: u64,
}

impl VerificationRequest {
    /// Create a request with independent limits for each side.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        source_path: P,
        target_path: Q,
        source_limit: u64,
        target_limit: u64,
    ) -> Self {
        Self {
            source_path: source_path.as_ref().to_path_buf(),
            target_path: target_path.as_ref().to_path_buf(),
            source_limit,
            target_limit,
        }
    }

    /// Create the request for a finished copy: the source is hashed up to
    /// the bytes read, the target up to the bytes written.
    pub fn from_copy<P: AsRef<Path>, Q: AsRef<Path>>(
        source_path: P,
        target_path: Q,
        copied: &CopyResult,
    ) -> Self {
        Self::new(
            source_path,
            target_path,
            copied.bytes_read,
            copied.bytes_written,
        )
    }
}

/// Outcome of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerificationResult {
    /// Whether the two digests are equal
    pub matches: bool,
    /// Digest of the source prefix
    pub source_digest: Digest,
    /// Digest of the target prefix
    pub target_digest: Digest,
}

/// Verify a copy with the default buffer size.
///
/// # Example
///
/// ```no_run
/// use rawcopy::{VerificationRequest, verify};
///
/// let request = VerificationRequest::new("disk.img", "/dev/sdb", 4_194_304, 4_194_304);
/// let result = verify(&request)?;
/// if !result.matches {
///     eprintln!("checksums do NOT match");
/// }
/// # Ok::<(), rawcopy::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::HashComputation`] wrapping the failure of either side.
/// If both sides fail, the source error is returned.
pub fn verify(request: &VerificationRequest) -> Result<VerificationResult> {
    verify_with_buffer(request, DEFAULT_BUFFER_SIZE, &CopyOptions::default())
}

/// Verify a copy using the buffer size and warning handler of `options`.
///
/// The `verify` flag of `options` is not consulted: calling this function
/// always verifies.
///
/// # Errors
///
/// Same as [`verify`], plus [`Error::InvalidBufferSize`] for a zero buffer.
pub fn verify_with_options(
    request: &VerificationRequest,
    options: &CopyOptions,
) -> Result<VerificationResult> {
    options.validate()?;
    verify_with_buffer(request, options.buffer_size, options)
}

fn verify_with_buffer(
    request: &VerificationRequest,
    buffer_size: usize,
    options: &CopyOptions,
) -> Result<VerificationResult> {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        source = %request.source_path.display(),
        target = %request.target_path.display(),
        source_limit = request.source_limit,
        target_limit = request.target_limit,
        "verifying"
    );

    let hash_source = || {
        hash_side(
            &request.source_path,
            Side::Source,
            request.source_limit,
            buffer_size,
        )
    };
    let hash_target = || {
        hash_side(
            &request.target_path,
            Side::Target,
            request.target_limit,
            buffer_size,
        )
    };

    // Two dedicated workers so both sides are always hashed in parallel,
    // independent of how busy the global pool is.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(2)
        .thread_name(|i| format!("rawcopy-verify-{i}"))
        .build();

    let (source, target) = match pool {
        Ok(pool) => pool.join(hash_source, hash_target),
        Err(e) => {
            options.warn(&format!(
                "Failed to create verification pool ({e}), using global pool"
            ));
            rayon::join(hash_source, hash_target)
        }
    };

    let source_digest = source?;
    let target_digest = target?;
    let matches = source_digest == target_digest;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        source_digest = %source_digest,
        target_digest = %target_digest,
        matches,
        "verification finished"
    );

    Ok(VerificationResult {
        matches,
        source_digest,
        target_digest,
    })
}

fn hash_side(path: &Path, side: Side, limit: u64, buffer_size: usize) -> Result<Digest> {
    hash_prefix(path, side, limit, buffer_size).map_err(|e| Error::HashComputation {
        side,
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}
