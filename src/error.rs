//! Error types for rawcopy.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur while copying or verifying, the [`ErrorCode`] used for
//! machine-readable reporting, and the [`Result`] type alias.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Configuration | [`Error::InvalidBufferSize`], [`Error::SameSourceAndTarget`] |
//! | Open | [`Error::SourceOpen`], [`Error::TargetOpen`], [`Error::TargetExists`] |
//! | Copy | [`Error::Read`], [`Error::Write`], [`Error::ShortWrite`], [`Error::Sync`] |
//! | Verification | [`Error::HashRead`], [`Error::ShortRead`], [`Error::HashComputation`] |
//!
//! Copy-phase errors carry the byte counts accumulated before the failure,
//! see [`Error::copied`].

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::copy::CopyResult;

/// Result type for rawcopy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// This helper function detects storage-full conditions across platforms.
///
/// # Platform Support
///
/// | Platform | Error Detection |
/// |----------|-----------------|
/// | Unix | `ENOSPC` (errno 28) |
/// | Windows | `ERROR_DISK_FULL` (0x70) |
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use rawcopy::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// if is_no_space_error(&error) {
///     println!("Target device is full!");
/// }
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    #[cfg(unix)]
    {
        // The raw OS error might be available even if kind() isn't StorageFull
        if let Some(raw_error) = error.raw_os_error() {
            const ENOSPC: i32 = 28;
            return raw_error == ENOSPC;
        }
    }

    #[cfg(windows)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            const ERROR_DISK_FULL: i32 = 112;
            return raw_error == ERROR_DISK_FULL;
        }
    }

    false
}

/// Which side of a copy a verification task was hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// The image or device that was read from
    Source,
    /// The image or device that was written to
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Errors that can occur during copy and verification.
///
/// All errors include relevant path information or byte counts to aid
/// debugging. Use the [`std::error::Error`] trait methods to access
/// underlying causes where applicable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The copy buffer size must be at least one byte
    #[error("Invalid buffer size {0}: must be greater than zero")]
    InvalidBufferSize(usize),

    /// Source and target name the same file
    #[error("Source must not be the same as target: {0}")]
    SameSourceAndTarget(PathBuf),

    /// Source could not be opened for reading
    #[error("Failed to open source {path}: {source}")]
    SourceOpen {
        /// Source path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Target could not be opened or created for writing
    #[error("Failed to open target {path}: {source}")]
    TargetOpen {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Target already exists and the target mode forbids touching it
    #[error("Target already exists: {0}")]
    TargetExists(PathBuf),

    /// Reading from the input stream failed
    #[error("Read failed after {} bytes: {source}", .copied.bytes_read)]
    Read {
        /// Byte counts accumulated before the failure
        copied: CopyResult,
        /// Underlying error
        source: io::Error,
    },

    /// Writing to the output stream failed
    #[error("Write failed after {} bytes: {source}", .copied.bytes_written)]
    Write {
        /// Byte counts accumulated before the failure
        copied: CopyResult,
        /// Underlying error
        source: io::Error,
    },

    /// The output stream accepted fewer bytes than it was offered
    ///
    /// The engine never retries a partial write. Whether retrying is safe
    /// depends on the target device, so the decision is left to the caller.
    #[error("Short write: {accepted} of {requested} bytes accepted after {} bytes", .copied.bytes_written)]
    ShortWrite {
        /// Bytes offered to the write call
        requested: usize,
        /// Bytes the write call reported as written
        accepted: usize,
        /// Byte counts including the partial write
        copied: CopyResult,
    },

    /// Flushing the target to stable storage failed
    #[error("Failed to sync target {path}: {source}")]
    Sync {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Reading a path failed while hashing it
    #[error("Read failed on {path} after hashing {hashed} bytes: {source}")]
    HashRead {
        /// Path being hashed
        path: PathBuf,
        /// Bytes fed to the hasher before the failure
        hashed: u64,
        /// Underlying error
        source: io::Error,
    },

    /// A path ended before the number of bytes it was asked to hash
    #[error("Short read on {path}: expected {limit} bytes, only {available} available")]
    ShortRead {
        /// Path being hashed
        path: PathBuf,
        /// Number of bytes requested
        limit: u64,
        /// Number of bytes that could be read
        available: u64,
    },

    /// A verification task failed
    #[error("Failed to hash {side} {path}: {source}")]
    HashComputation {
        /// Which side the task was hashing
        side: Side,
        /// Path being hashed
        path: PathBuf,
        /// The error raised inside the task
        source: Box<Error>,
    },
}

impl Error {
    /// Byte counts accumulated before a copy-phase failure.
    ///
    /// Returns `None` for errors raised outside the copy loop.
    #[must_use]
    pub fn copied(&self) -> Option<CopyResult> {
        match self {
            Self::Read { copied, .. }
            | Self::Write { copied, .. }
            | Self::ShortWrite { copied, .. } => Some(*copied),
            _ => None,
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidBufferSize(_) | Self::SameSourceAndTarget(_) => ErrorCode::InvalidInput,
            Self::SourceOpen { .. } => ErrorCode::SourceOpen,
            Self::TargetOpen { .. } => ErrorCode::TargetOpen,
            Self::TargetExists(_) => ErrorCode::TargetExists,
            Self::Read { .. } | Self::HashRead { .. } => ErrorCode::ReadFailed,
            Self::Write { source, .. } | Self::Sync { source, .. } => {
                if is_no_space_error(source) {
                    ErrorCode::NoSpace
                } else {
                    ErrorCode::WriteFailed
                }
            }
            Self::ShortWrite { .. } => ErrorCode::ShortWrite,
            Self::ShortRead { .. } => ErrorCode::ShortRead,
            Self::HashComputation { .. } => ErrorCode::HashFailed,
        }
    }

    /// Whether the error was raised by the verification engine.
    #[must_use]
    pub fn is_verification_error(&self) -> bool {
        matches!(
            self,
            Self::HashRead { .. } | Self::ShortRead { .. } | Self::HashComputation { .. }
        )
    }
}

/// Machine-readable error categories.
///
/// The string forms returned by [`ErrorCode::as_str`] are stable and used
/// in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Bad configuration or arguments
    InvalidInput,
    /// Source could not be opened
    SourceOpen,
    /// Target could not be opened
    TargetOpen,
    /// Target exists and may not be replaced
    TargetExists,
    /// Reading the source failed
    ReadFailed,
    /// Writing the target failed
    WriteFailed,
    /// Target accepted fewer bytes than offered
    ShortWrite,
    /// Target ran out of space
    NoSpace,
    /// A path ended before its verification limit
    ShortRead,
    /// A verification task failed
    HashFailed,
}

impl ErrorCode {
    /// Stable string form of the code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::SourceOpen => "source_open",
            Self::TargetOpen => "target_open",
            Self::TargetExists => "target_exists",
            Self::ReadFailed => "read_failed",
            Self::WriteFailed => "write_failed",
            Self::ShortWrite => "short_write",
            Self::NoSpace => "no_space",
            Self::ShortRead => "short_read",
            Self::HashFailed => "hash_failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
