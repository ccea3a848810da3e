//! Temporary output locations for tests.

use std::path::PathBuf;

/// Creates a temporary directory with a specific prefix.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// Returns `<dir>/pile.bin` inside a fresh temporary directory.
///
/// Keep the `TempDir` alive for as long as the path is used.
pub fn temp_pile_path() -> (tempfile::TempDir, PathBuf) {
    let dir = temp_test_dir_with_prefix("pile_test_");
    let path = dir.path().join("pile.bin");
    (dir, path)
}
