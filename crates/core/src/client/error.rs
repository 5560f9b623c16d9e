use engine::EngineError;
use filters::NoUsableExcludes;
use journal::JournalError;

use crate::account::AccountError;
use crate::target::TargetError;

/// Failure of the run before or during the restart loop.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The account could not be constructed.
    #[error(transparent)]
    Account(#[from] AccountError),
    /// The target address could not be normalized.
    #[error(transparent)]
    Target(#[from] TargetError),
    /// Neither exclude-pattern source was usable.
    #[error(transparent)]
    Excludes(#[from] NoUsableExcludes),
    /// The journal could not be read or persisted.
    #[error(transparent)]
    Journal(#[from] JournalError),
    /// The engine reported a hard error.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
