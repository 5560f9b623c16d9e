use std::io;
use std::path::PathBuf;

/// Error produced when the journal cannot be read or persisted.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// The journal file could not be read.
    #[error("failed to read journal '{}': {source}", .path.display())]
    Read {
        /// Journal file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The journal file could not be written.
    #[error("failed to write journal '{}': {source}", .path.display())]
    Write {
        /// Journal file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The journal document could not be serialized.
    #[error("failed to encode journal '{}': {source}", .path.display())]
    Encode {
        /// Journal file path.
        path: PathBuf,
        /// Underlying serialization failure.
        source: serde_json::Error,
    },
}
