use std::io;
use std::path::PathBuf;

use journal::JournalError;

/// Hard failure of one synchronization pass.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The local sync folder disappeared or cannot be read.
    #[error("local sync folder '{}' is not accessible: {source}", .path.display())]
    LocalRoot {
        /// The inaccessible folder.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// Walking the local tree failed.
    #[error("failed to walk local sync folder: {0}")]
    Walk(#[from] jwalk::Error),
    /// The journal could not be read or persisted.
    #[error(transparent)]
    Journal(#[from] JournalError),
    /// The engine worker terminated without reporting a result.
    #[error("sync engine terminated without reporting a result")]
    Aborted,
}
