//! # rawcopy
//!
//! Raw byte copying of disk images, block devices and partitions, with
//! bounded, concurrent checksum verification.
//!
//! ## Core Features
//!
//! - **Streaming copy**: One reusable buffer of configurable size, strict read/write alternation
//! - **Exact accounting**: Bytes read and written are reported on success and on failure
//! - **No silent short writes**: A target accepting fewer bytes than offered is an error
//! - **Bounded verification**: Each side is hashed only up to the bytes actually copied,
//!   so a device larger than its image still verifies
//! - **Concurrent hashing**: Source and target are hashed in parallel with SHA-256
//! - **Mismatch is not an error**: A checksum mismatch is a result, an I/O failure is an error
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use rawcopy::ImageBuilder;
//!
//! let report = ImageBuilder::new("raspios.img", "/dev/sdb").run()?;
//! println!("Copied {} bytes", report.copy.bytes_written);
//! match report.verification {
//!     Some(v) if v.matches => println!("checksums match: {}", v.source_digest),
//!     Some(_) => println!("checksums do NOT match"),
//!     None => println!("verification skipped"),
//! }
//! # Ok::<(), rawcopy::Error>(())
//! ```
//!
//! ## Stream and Verification API
//!
//! The two engines can be used separately. The caller owns the streams:
//!
//! ```no_run
//! use rawcopy::{VerificationRequest, copy_stream, verify};
//! use std::fs::{File, OpenOptions};
//!
//! let mut input = File::open("image.img")?;
//! let mut output = OpenOptions::new().write(true).open("/dev/sdb")?;
//! let copied = copy_stream(&mut input, &mut output, 1024 * 1024)?;
//! output.sync_all()?;
//! drop((input, output));
//!
//! let result = verify(&VerificationRequest::from_copy("image.img", "/dev/sdb", &copied))?;
//! assert!(result.matches);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `progress` | Progress bar support with indicatif |
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for options and results |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod copy;
mod error;
mod options;
mod verify;

#[cfg(feature = "progress")]
mod progress;

pub use builder::{ImageBuilder, ImageReport, copy_image, copy_image_with_progress};
pub use copy::{CopyResult, copy_stream, copy_stream_with_progress};
pub use error::{Error, ErrorCode, Result, Side, is_no_space_error};
pub use options::{CopyOptions, DEFAULT_BUFFER_SIZE, TargetMode};
pub use verify::{
    DIGEST_LEN, Digest, VerificationRequest, VerificationResult, hash_prefix, verify,
    verify_with_options,
};

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::create_progress_bar;
