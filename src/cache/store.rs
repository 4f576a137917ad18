// Cache store for reading and writing the LOC cache file.
// Handles comment-block preservation, corruption recovery, and atomic rewrites.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, StatsError};

use super::record::{COMMENT_BLOCK_LINES, CacheFile};

/// Handle on one user's LOC cache file.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
    comment_lines: usize,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            comment_lines: COMMENT_BLOCK_LINES,
        }
    }

    /// Override the size of the reserved comment block.
    pub fn with_comment_lines(mut self, comment_lines: usize) -> Self {
        self.comment_lines = comment_lines;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cache, creating an empty file with a comment block if absent.
    pub fn load(&self) -> Result<CacheFile> {
        let Some(text) = read_text(&self.path)? else {
            debug!(path = %self.path.display(), "creating new LOC cache");
            let mut file = CacheFile::new();
            file.comments.resize(self.comment_lines, "#".to_string());
            self.save(&file)?;
            return Ok(file);
        };

        let (file, problems) = CacheFile::parse(&text, self.comment_lines);
        for problem in &problems {
            warn!(path = %self.path.display(), "{}; record reset", problem);
        }
        Ok(file)
    }

    /// Replace the cache file with `file`.
    pub fn save(&self, file: &CacheFile) -> Result<()> {
        write_text(&self.path, &file.render())
    }
}

/// Write text through a uniquely named temp file in the same directory and
/// rename it over `path`.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    let fs_err = |e: io::Error| StatsError::filesystem(path, e);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Ensure parent directory exists
    fs::create_dir_all(dir).map_err(fs_err)?;

    let mut temp = NamedTempFile::new_in(dir).map_err(fs_err)?;
    temp.write_all(text.as_bytes()).map_err(fs_err)?;
    temp.as_file().sync_all().map_err(fs_err)?;
    temp.persist(path).map_err(|e| fs_err(e.error))?;

    Ok(())
}

/// Read a text file, returning `None` if it does not exist.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StatsError::Io(e)),
    }
}
