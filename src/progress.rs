//! Progress reporting support (requires `progress` feature)

use indicatif::{ProgressBar, ProgressStyle};

/// Create a default progress bar for copying `total` bytes
///
/// When the total is unknown (e.g. reading from a block device whose size
/// could not be determined), pass `0` to get a spinner that still shows
/// bytes and throughput.
#[must_use]
pub fn create_progress_bar(total: u64) -> ProgressBar {
    if total == 0 {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {bytes} ({bytes_per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        return pb;
    }

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}
