use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors for a clean run. A per-file deletion failure is not one of
/// these; it is counted in the purge outcome and the run moves on.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to collect referenced files: {0}")]
    Collect(#[source] diesel::result::Error),

    #[error("failed to write backup archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: ArchiveError,
    },

    #[error("failed to write deletion log {path}: {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to persist clean run record: {0}")]
    Persist(#[source] diesel::result::Error),
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
