use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error produced when a rule cannot be compiled into a matcher.
#[derive(Debug)]
pub struct PatternError {
    pattern: String,
    source: globset::Error,
}

impl PatternError {
    pub(crate) fn new(pattern: String, source: globset::Error) -> Self {
        Self { pattern, source }
    }

    /// Returns the offending pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to compile exclude pattern '{}': {}",
            self.pattern, self.source
        )
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Error produced when an exclude-pattern file cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ExcludeFileError {
    /// The pattern file could not be read from disk.
    #[error("failed to read exclude list '{}': {source}", .path.display())]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// A pattern inside the file did not compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Fatal admission failure: neither exclude-pattern source was usable.
///
/// A run must not proceed with zero exclusion patterns active, since that
/// silently changes sync semantics.
#[derive(Debug)]
pub struct NoUsableExcludes {
    pub(crate) system: Option<PathBuf>,
    pub(crate) user: Option<PathBuf>,
}

impl NoUsableExcludes {
    /// Returns the system exclude-list path that failed to load, if one was
    /// attempted.
    #[must_use]
    pub fn system(&self) -> Option<&PathBuf> {
        self.system.as_ref()
    }

    /// Returns the user exclude-list path that failed to load, if one was
    /// supplied.
    #[must_use]
    pub fn user(&self) -> Option<&PathBuf> {
        self.user.as_ref()
    }
}

impl fmt::Display for NoUsableExcludes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot load system exclude list")?;
        if let Some(system) = &self.system {
            write!(f, " '{}'", system.display())?;
        }
        write!(f, " or list supplied via --exclude")?;
        if let Some(user) = &self.user {
            write!(f, " '{}'", user.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for NoUsableExcludes {}
