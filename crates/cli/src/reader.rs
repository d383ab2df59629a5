//! Input file opening.
//!
//! The input is streamed line by line, never read whole, so files of any size
//! are accepted.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

/// Default read buffer size (64KB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Size at which to note a large input (1GB).
pub const LARGE_FILE_INFO: u64 = 1024 * 1024 * 1024;

/// Opens input files for scanning.
pub struct FileReader {
    /// Capacity of the returned buffered reader.
    buffer_size: usize,
}

impl Default for FileReader {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl FileReader {
    /// Create a new file reader with the default buffer size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with a custom buffer size.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self { buffer_size }
    }

    /// Open `path` for buffered reading.
    ///
    /// Directories are rejected up front; reading one would fail on the
    /// first line on some platforms and succeed with no lines on others.
    pub fn open(&self, path: &Path) -> Result<BufReader<File>> {
        let io_error = |source: io::Error| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let metadata = file.metadata().map_err(io_error)?;
        if metadata.is_dir() {
            return Err(io_error(io::Error::new(
                io::ErrorKind::IsADirectory,
                "is a directory",
            )));
        }

        let size = metadata.len();
        if size > LARGE_FILE_INFO {
            tracing::info!(
                path = %path.display(),
                size_mb = size as f64 / 1_000_000.0,
                "Reading large file"
            );
        } else {
            tracing::debug!(path = %path.display(), size, "opened input");
        }

        Ok(BufReader::with_capacity(self.buffer_size, file))
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
