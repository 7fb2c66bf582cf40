//! Copy engine.
//!
//! This module provides the streaming copy loop with explicit byte
//! accounting, plus the helpers that open a source and target for it.

mod stream;
mod target;

// Re-export public API
pub use stream::{CopyResult, copy_stream, copy_stream_with_progress};
pub(crate) use target::{ensure_distinct, open_source, open_target, sync_target};
