//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test fixture that provides a scratch directory with a source image.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with a fresh scratch directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Path of a file inside the scratch directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a pseudo-random image of `size` bytes and return its path.
    pub fn create_image(&self, name: &str, size: usize, seed: u64) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, pseudo_random(size, seed)).expect("Failed to write image");
        path
    }

    /// Assert that two files have identical content.
    pub fn assert_same_content(&self, a: &Path, b: &Path) {
        let left = fs::read(a).expect("Failed to read file");
        let right = fs::read(b).expect("Failed to read file");
        assert_eq!(left.len(), right.len(), "File length mismatch");
        assert!(left == right, "File content mismatch");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic pseudo-random bytes (xorshift64).
pub fn pseudo_random(len: usize, mut seed: u64) -> Vec<u8> {
    seed |= 1;
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed >> 24) as u8
        })
        .collect()
}
