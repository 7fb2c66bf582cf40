//! Builder API for copying an image and verifying it.
//!
//! The builder pattern provides a fluent interface for configuring and
//! executing a copy. This is often more convenient than manually
//! constructing [`CopyOptions`] and calling [`copy_image`].
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use rawcopy::ImageBuilder;
//!
//! let report = ImageBuilder::new("debian.iso", "/dev/sdb").run()?;
//! println!("Wrote {} bytes", report.copy.bytes_written);
//! if report.verified() {
//!     println!("checksums match");
//! }
//! # Ok::<(), rawcopy::Error>(())
//! ```
//!
//! ## With Options
//!
//! ```no_run
//! use rawcopy::ImageBuilder;
//!
//! let report = ImageBuilder::new("backup.img", "restore.img")
//!     .buffer_size_kib(4096)  // 4 MiB per read/write
//!     .truncate()             // Replace an existing file
//!     .no_verify()            // Skip checksums
//!     .run()?;
//! # Ok::<(), rawcopy::Error>(())
//! ```

use crate::copy::{
    CopyResult, copy_stream_with_progress, ensure_distinct, open_source, open_target, sync_target,
};
use crate::error::Result;
use crate::options::{CopyOptions, TargetMode};
use crate::verify::{VerificationRequest, VerificationResult, verify_with_options};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Summary of a finished image copy.
///
/// A checksum mismatch is reported here (see [`ImageReport::verified`]),
/// not as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageReport {
    /// Byte counts of the copy
    pub copy: CopyResult,
    /// Verification outcome, `None` if verification was disabled
    pub verification: Option<VerificationResult>,
    /// Time spent copying and verifying
    pub duration: Duration,
}

impl ImageReport {
    /// Whether verification ran and the checksums matched.
    #[must_use]
    pub fn verified(&self) -> bool {
        self.verification.is_some_and(|v| v.matches)
    }

    /// Whether verification ran and the checksums differ.
    #[must_use]
    pub fn mismatched(&self) -> bool {
        self.verification.is_some_and(|v| !v.matches)
    }
}

/// Copy `source` to `target` and, unless disabled, verify the result.
///
/// Steps, in order: validate options, refuse copying a path onto itself,
/// open both sides, copy, sync the target, close both sides, verify.
///
/// # Errors
///
/// Returns an error if:
/// - Options are invalid ([`Error::InvalidBufferSize`])
/// - Source and target are the same file ([`Error::SameSourceAndTarget`])
/// - Either side cannot be opened ([`Error::SourceOpen`], [`Error::TargetOpen`],
///   [`Error::TargetExists`])
/// - The copy fails ([`Error::Read`], [`Error::Write`], [`Error::ShortWrite`])
/// - Syncing a regular file or block device target fails ([`Error::Sync`])
/// - Verification cannot complete ([`Error::HashComputation`])
///
/// [`Error::InvalidBufferSize`]: crate::Error::InvalidBufferSize
/// [`Error::SameSourceAndTarget`]: crate::Error::SameSourceAndTarget
/// [`Error::SourceOpen`]: crate::Error::SourceOpen
/// [`Error::TargetOpen`]: crate::Error::TargetOpen
/// [`Error::TargetExists`]: crate::Error::TargetExists
/// [`Error::Read`]: crate::Error::Read
/// [`Error::Write`]: crate::Error::Write
/// [`Error::ShortWrite`]: crate::Error::ShortWrite
/// [`Error::Sync`]: crate::Error::Sync
/// [`Error::HashComputation`]: crate::Error::HashComputation
pub fn copy_image(source: &Path, target: &Path, options: &CopyOptions) -> Result<ImageReport> {
    copy_image_with_progress(source, target, options, |_| {})
}

/// Like [`copy_image`], reporting running byte counts to `on_progress`.
///
/// # Errors
///
/// Same as [`copy_image`].
pub fn copy_image_with_progress<F>(
    source: &Path,
    target: &Path,
    options: &CopyOptions,
    on_progress: F,
) -> Result<ImageReport>
where
    F: FnMut(CopyResult),
{
    options.validate()?;
    ensure_distinct(source, target)?;

    let start_time = Instant::now();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        buffer_size = options.buffer_size,
        target_mode = ?options.target_mode,
        "copying image"
    );

    let mut input = open_source(source)?;
    let mut output = open_target(target, options.target_mode)?;

    let copy = copy_stream_with_progress(&mut input, &mut output, options.buffer_size, on_progress)?;

    if options.fsync {
        sync_target(&output, target, options)?;
    }

    drop(input);
    drop(output);

    let verification = if options.verify {
        let request = VerificationRequest::from_copy(source, target, &copy);
        Some(verify_with_options(&request, options)?)
    } else {
        None
    };

    Ok(ImageReport {
        copy,
        verification,
        duration: start_time.elapsed(),
    })
}

/// A builder for configuring and executing an image copy.
///
/// # Example
///
/// ```no_run
/// use rawcopy::{ImageBuilder, TargetMode};
///
/// let report = ImageBuilder::new("image.raw", "/dev/mmcblk0")
///     .buffer_size(8 * 1024 * 1024)
///     .target_mode(TargetMode::Overwrite)
///     .run()?;
/// # Ok::<(), rawcopy::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    source: PathBuf,
    target: PathBuf,
    options: CopyOptions,
}

impl ImageBuilder {
    /// Create a new `ImageBuilder` with the given source and target paths.
    ///
    /// Uses default options (1 MiB buffer, verify, fsync, overwrite in place).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(source: P, target: Q) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            target: target.as_ref().to_path_buf(),
            options: CopyOptions::default(),
        }
    }

    /// Set the buffer size in bytes.
    #[must_use]
    pub fn buffer_size(mut self, bytes: usize) -> Self {
        self.options = self.options.with_buffer_size(bytes);
        self
    }

    /// Set the buffer size in kibibytes.
    #[must_use]
    pub fn buffer_size_kib(mut self, kib: usize) -> Self {
        self.options = self.options.with_buffer_size_kib(kib);
        self
    }

    /// Skip checksum creation and comparison.
    #[must_use]
    pub fn no_verify(mut self) -> Self {
        self.options = self.options.without_verify();
        self
    }

    /// Skip syncing the target before verification.
    ///
    /// **Warning**: verification may then read cached data instead of what
    /// reached the device.
    #[must_use]
    pub fn no_fsync(mut self) -> Self {
        self.options = self.options.without_fsync();
        self
    }

    /// Set how an existing target is opened.
    #[must_use]
    pub fn target_mode(mut self, mode: TargetMode) -> Self {
        self.options = self.options.with_target_mode(mode);
        self
    }

    /// Truncate an existing target file before writing.
    ///
    /// This is shorthand for `.target_mode(TargetMode::Truncate)`.
    #[must_use]
    pub fn truncate(self) -> Self {
        self.target_mode(TargetMode::Truncate)
    }

    /// Set a handler for warning messages.
    #[must_use]
    pub fn warn_handler(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_warn_handler(handler);
        self
    }

    /// Get the current options.
    #[must_use]
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Execute the copy.
    ///
    /// # Errors
    ///
    /// See [`copy_image`].
    pub fn run(self) -> Result<ImageReport> {
        copy_image(&self.source, &self.target, &self.options)
    }

    /// Execute the copy, reporting running byte counts to `on_progress`.
    ///
    /// # Errors
    ///
    /// See [`copy_image`].
    pub fn run_with_progress<F: FnMut(CopyResult)>(self, on_progress: F) -> Result<ImageReport> {
        copy_image_with_progress(&self.source, &self.target, &self.options, on_progress)
    }
}
