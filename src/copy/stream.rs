//! Streaming copy between an input and an output byte stream.
//!
//! Reads and writes strictly alternate: one buffer is read, then exactly
//! that many bytes are offered to the output before the next read. There
//! is no read-ahead and no write-behind.

use crate::error::{Error, Result};
use std::io::{self, Read, Write};

/// Byte counts of a copy.
///
/// Returned by [`copy_stream`] on success and carried by copy-phase errors
/// (see [`Error::copied`]) on failure.
///
/// # Example
///
/// ```
/// use rawcopy::copy_stream;
/// use std::io::Cursor;
///
/// let mut input = Cursor::new(vec![7u8; 10_000]);
/// let mut output = Vec::new();
/// let result = copy_stream(&mut input, &mut output, 4096)?;
/// assert_eq!(result.bytes_read, 10_000);
/// assert!(result.is_complete());
/// # Ok::<(), rawcopy::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyResult {
    /// Total bytes returned by the input stream
    pub bytes_read: u64,
    /// Total bytes accepted by the output stream
    pub bytes_written: u64,
}

impl CopyResult {
    /// Whether every byte read was also written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.bytes_read == self.bytes_written
    }
}

/// Copy everything from `input` to `output` using a buffer of
/// `buffer_size` bytes.
///
/// Neither stream is closed or flushed; that remains the caller's job.
///
/// # Errors
///
/// - [`Error::InvalidBufferSize`] if `buffer_size` is zero (nothing is read)
/// - [`Error::Read`] if the input fails
/// - [`Error::Write`] if the output fails
/// - [`Error::ShortWrite`] if the output accepts fewer bytes than offered
///
/// Every copy-phase error carries the counts accumulated so far.
/// `Interrupted` errors are retried and never surface.
pub fn copy_stream<R, W>(input: &mut R, output: &mut W, buffer_size: usize) -> Result<CopyResult>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    copy_stream_with_progress(input, output, buffer_size, |_| {})
}

/// Like [`copy_stream`], calling `on_progress` with the running totals
/// after every buffer is written.
///
/// # Errors
///
/// Same as [`copy_stream`].
pub fn copy_stream_with_progress<R, W, F>(
    input: &mut R,
    output: &mut W,
    buffer_size: usize,
    mut on_progress: F,
) -> Result<CopyResult>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(CopyResult),
{
    if buffer_size == 0 {
        return Err(Error::InvalidBufferSize(buffer_size));
    }

    let mut buffer = vec![0u8; buffer_size];
    let mut copied = CopyResult::default();

    loop {
        let n = match input.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => return Err(Error::Read { copied, source }),
        };
        copied.bytes_read += n as u64;

        let accepted = write_once(output, &buffer[..n], copied)?;
        copied.bytes_written += accepted as u64;

        if accepted < n {
            return Err(Error::ShortWrite {
                requested: n,
                accepted,
                copied,
            });
        }

        on_progress(copied);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        bytes_read = copied.bytes_read,
        bytes_written = copied.bytes_written,
        buffer_size,
        "stream copy finished"
    );

    Ok(copied)
}

/// Issue a single write call for `chunk`, retrying only on `Interrupted`.
fn write_once<W: Write + ?Sized>(output: &mut W, chunk: &[u8], copied: CopyResult) -> Result<usize> {
    loop {
        match output.write(chunk) {
            Ok(accepted) => return Ok(accepted),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => return Err(Error::Write { copied, source }),
        }
    }
}
