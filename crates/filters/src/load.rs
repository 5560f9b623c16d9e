use std::fs;
use std::path::Path;

use crate::{ExcludeFileError, ExcludeRule, ExcludeSet, NoUsableExcludes};

/// Parses exclude rules from pattern-file text.
///
/// Blank lines and lines starting with `#` are skipped.
#[must_use]
pub fn parse_rules(text: &str) -> Vec<ExcludeRule> {
    text.lines().filter_map(ExcludeRule::parse_line).collect()
}

/// Reads and parses an exclude-pattern file.
///
/// # Errors
///
/// Returns [`ExcludeFileError::Read`] when the file cannot be read.
pub fn read_rules(path: &Path) -> Result<Vec<ExcludeRule>, ExcludeFileError> {
    let text = fs::read_to_string(path).map_err(|source| ExcludeFileError::Read {
        path: path.to_owned(),
        source,
    })?;
    Ok(parse_rules(&text))
}

/// Loads the system-wide and user-supplied exclude lists and merges them.
///
/// Each source loads independently; a missing or unreadable file fails only
/// that source. The merged set keeps system rules ahead of user rules so user
/// patterns are evaluated after the baseline.
///
/// # Errors
///
/// Returns [`NoUsableExcludes`] when the system source fails and no user
/// source was usable either. This is fatal for the run: proceeding with zero
/// exclusion patterns would silently change sync semantics.
pub fn load_exclude_set(
    system: Option<&Path>,
    user: Option<&Path>,
) -> Result<ExcludeSet, NoUsableExcludes> {
    let system_set = system.and_then(|path| load_one(path, "system"));
    let user_set = user.and_then(|path| load_one(path, "user"));

    match (system_set, user_set) {
        (Some(system_set), Some(user_set)) => Ok(system_set.merged(&user_set)),
        (Some(set), None) | (None, Some(set)) => Ok(set),
        (None, None) => Err(NoUsableExcludes {
            system: system.map(Path::to_owned),
            user: user.map(Path::to_owned),
        }),
    }
}

fn load_one(path: &Path, origin: &str) -> Option<ExcludeSet> {
    let rules = match read_rules(path) {
        Ok(rules) => rules,
        Err(error) => {
            tracing::warn!(%error, origin, "exclude list not loaded");
            return None;
        }
    };
    match ExcludeSet::from_rules(rules) {
        Ok(set) => {
            tracing::debug!(path = %path.display(), origin, rules = set.len(), "loaded exclude list");
            Some(set)
        }
        Err(error) => {
            tracing::warn!(%error, origin, "exclude list not loaded");
            None
        }
    }
}
