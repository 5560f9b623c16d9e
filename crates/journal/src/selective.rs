use std::io::{self, BufRead};

use rustc_hash::FxHashSet;

/// Ordered list of folder paths excluded from synchronization.
///
/// Every entry is normalized to end with a path separator before it is
/// compared or persisted, so `Documents` and `Documents/` refer to the same
/// folder.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SelectiveSyncList {
    entries: Vec<String>,
}

impl SelectiveSyncList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a folder path, normalizing the trailing separator.
    pub fn push(&mut self, folder: impl Into<String>) {
        let mut folder = folder.into();
        if !folder.ends_with('/') {
            folder.push('/');
        }
        self.entries.push(folder);
    }

    /// Parses a selective-sync folder file.
    ///
    /// One path per line; blank lines and lines starting with `#` are
    /// ignored; every entry is separator-terminated.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying reader.
    pub fn from_reader<R: io::Read>(reader: R) -> io::Result<Self> {
        let mut list = Self::new();
        for line in io::BufReader::new(reader).lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            list.push(trimmed);
        }
        Ok(list)
    }

    /// Builds a list from an iterator of folder paths.
    pub fn from_folders<I, S>(folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        for folder in folders {
            list.push(folder);
        }
        list
    }

    /// Returns `true` when no folders are excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates the entries in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Returns `true` if `folder` (separator-terminated) is excluded.
    #[must_use]
    pub fn contains(&self, folder: &str) -> bool {
        self.entries.iter().any(|entry| entry == folder)
    }

    /// Collapses the entries into set semantics for comparison.
    #[must_use]
    pub fn as_set(&self) -> FxHashSet<&str> {
        self.entries.iter().map(String::as_str).collect()
    }

    /// Returns the entries as owned strings, in definition order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.entries.clone()
    }
}

impl<'a> IntoIterator for &'a SelectiveSyncList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::SelectiveSyncList;

    #[test]
    fn entries_are_separator_terminated() {
        let mut list = SelectiveSyncList::new();
        list.push("Documents");
        list.push("Photos/");
        assert_eq!(list.to_vec(), vec!["Documents/", "Photos/"]);
    }

    #[test]
    fn reader_skips_blanks_and_comments() {
        let text = "# excluded folders\n\nDocuments\n  Photos/  \n#Music\n";
        let list = SelectiveSyncList::from_reader(text.as_bytes()).expect("parse");
        assert_eq!(list.to_vec(), vec!["Documents/", "Photos/"]);
    }

    #[test]
    fn set_view_collapses_duplicates() {
        let list = SelectiveSyncList::from_folders(["A", "A/", "B"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.as_set().len(), 2);
    }

    #[test]
    fn contains_uses_normalized_form() {
        let list = SelectiveSyncList::from_folders(["A"]);
        assert!(list.contains("A/"));
        assert!(!list.contains("A"));
    }
}
