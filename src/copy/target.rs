//! Opening the source and target of an image copy.

use crate::error::{Error, Result};
use crate::options::{CopyOptions, TargetMode};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Open the source for reading.
pub(crate) fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::SourceOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Open the target for writing according to `mode`.
///
/// A missing target is created in every mode. An existing one is written
/// in place, truncated, or refused.
pub(crate) fn open_target(path: &Path, mode: TargetMode) -> Result<File> {
    let mut open = OpenOptions::new();
    open.write(true);

    match mode {
        TargetMode::Overwrite => {
            open.create(true);
        }
        TargetMode::Truncate => {
            open.create(true).truncate(true);
        }
        TargetMode::Error => {
            open.create_new(true);
        }
    }

    open.open(path).map_err(|source| {
        if mode == TargetMode::Error && source.kind() == io::ErrorKind::AlreadyExists {
            Error::TargetExists(path.to_path_buf())
        } else {
            Error::TargetOpen {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Flush the target to stable storage.
///
/// Character devices and pipes reject `fsync` with `EINVAL`. For a target
/// that is neither a regular file nor a block device that failure is
/// passed to [`CopyOptions::warn`] and the copy goes on.
pub(crate) fn sync_target(file: &File, path: &Path, options: &CopyOptions) -> Result<()> {
    match file.sync_all() {
        Ok(()) => Ok(()),
        Err(source) if is_unsyncable(file, &source) => {
            options.warn(&format!(
                "Target {} does not support sync, skipping: {}",
                path.display(),
                source
            ));
            Ok(())
        }
        Err(source) => Err(Error::Sync {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn is_unsyncable(file: &File, error: &io::Error) -> bool {
    #[cfg(unix)]
    {
        const EINVAL: i32 = 22;
        if error.raw_os_error() == Some(EINVAL) {
            return file
                .metadata()
                .is_ok_and(|metadata| !is_syncable_type(metadata.file_type()));
        }
    }

    #[cfg(not(unix))]
    let _ = (file, error);

    false
}

fn is_syncable_type(file_type: fs::FileType) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if file_type.is_block_device() {
            return true;
        }
    }

    file_type.is_file()
}

/// Refuse to copy a path onto itself.
///
/// Paths are compared after canonicalization when both exist, so
/// `./disk.img` and `disk.img` are recognized as the same file.
pub(crate) fn ensure_distinct(source: &Path, target: &Path) -> Result<()> {
    if source == target {
        return Err(Error::SameSourceAndTarget(source.to_path_buf()));
    }

    if let (Ok(src), Ok(dst)) = (fs::canonicalize(source), fs::canonicalize(target)) {
        if src == dst {
            return Err(Error::SameSourceAndTarget(src));
        }
    }

    Ok(())
}
