// Cache path utilities.
// Locates the per-user LOC cache file and the repository archive.

use std::path::{Path, PathBuf};

use super::record::digest;

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Default archive file name inside the cache directory.
pub const ARCHIVE_FILE_NAME: &str = "repository_archive.txt";

/// Path to the LOC cache file for a login: `<dir>/<sha256(login)>.txt`.
pub fn cache_file_path(cache_dir: &Path, login: &str) -> PathBuf {
    cache_dir.join(format!("{}.txt", digest(login)))
}

/// Path to the archive file inside a cache directory.
pub fn archive_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(ARCHIVE_FILE_NAME)
}
