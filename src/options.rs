//! Configuration options for copy operations.
//!
//! This module provides [`CopyOptions`] for configuring copy and
//! verification behavior and [`TargetMode`] for deciding how an existing
//! target is opened.
//!
//! # Example
//!
//! ```
//! use rawcopy::{CopyOptions, TargetMode};
//!
//! let options = CopyOptions::default()
//!     .with_buffer_size_kib(4096)
//!     .with_target_mode(TargetMode::Truncate)
//!     .without_fsync();
//! assert_eq!(options.buffer_size, 4 * 1024 * 1024);
//! ```

use crate::error::{Error, Result};

/// Default copy buffer size (1 MiB).
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// How the target is opened when it already exists.
///
/// A missing target is always created, except that [`TargetMode::Error`]
/// only ever creates.
///
/// # Default
///
/// The default is [`TargetMode::Overwrite`], which writes into the existing
/// file or device in place. Block devices cannot be truncated, so this is
/// the only mode that works for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetMode {
    /// Write over the existing content from offset zero (default).
    ///
    /// Bytes past the end of the copied payload are left untouched.
    /// Verification only hashes the copied payload, so they never affect
    /// the result.
    #[default]
    Overwrite,
    /// Truncate an existing regular file before writing.
    Truncate,
    /// Return [`Error::TargetExists`] if the target already exists.
    Error,
}

/// Options for copy operations.
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `buffer_size` | 1 MiB | Bytes moved per read/write |
/// | `verify` | `true` | Hash both sides after copying |
/// | `fsync` | `true` | Sync target before verifying |
/// | `target_mode` | `Overwrite` | Write existing targets in place |
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyOptions {
    /// Size of the single reusable copy buffer in bytes (default: 1 MiB)
    ///
    /// The same size is used by each verification task when reading.
    /// Must be greater than zero, see [`CopyOptions::validate`].
    pub buffer_size: usize,

    /// Whether to verify the copy by comparing checksums (default: true)
    pub verify: bool,

    /// Whether to sync the target to disk before closing it (default: true)
    ///
    /// Without this, verification may read back cached pages instead of
    /// what reached the device.
    pub fsync: bool,

    /// How an existing target is opened
    pub target_mode: TargetMode,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    /// Otherwise, warnings are silently ignored.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warn_handler: Option<fn(&str)>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            verify: true,
            fsync: true,
            target_mode: TargetMode::Overwrite,
            warn_handler: None,
        }
    }
}

impl CopyOptions {
    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Set the buffer size in bytes
    ///
    /// Zero is accepted here and rejected by [`CopyOptions::validate`].
    #[must_use]
    pub fn with_buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = bytes;
        self
    }

    /// Set the buffer size in kibibytes
    #[must_use]
    pub fn with_buffer_size_kib(mut self, kib: usize) -> Self {
        self.buffer_size = kib.saturating_mul(1024);
        self
    }

    /// Set how an existing target is opened
    #[must_use]
    pub fn with_target_mode(mut self, mode: TargetMode) -> Self {
        self.target_mode = mode;
        self
    }

    /// Skip checksum creation and comparison
    #[must_use]
    pub fn without_verify(mut self) -> Self {
        self.verify = false;
        self
    }

    /// Disable fsync for faster (but less durable) copies
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }

    /// Check the options for configuration errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBufferSize`] if `buffer_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(Error::InvalidBufferSize(self.buffer_size));
        }
        Ok(())
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }
}
