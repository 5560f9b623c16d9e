use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{JournalError, SelectiveSyncList};

/// Name of the journal document inside the synced tree.
pub const JOURNAL_FILE_NAME: &str = ".cloudcmd.journal";

/// Handle on the persisted per-folder sync metadata of one synced tree.
///
/// The document is loaded once on [`open`](Self::open) and mutated in memory;
/// [`flush`](Self::flush) writes it back atomically. Folder keys are always
/// separator-terminated.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    existed: bool,
    doc: JournalDocument,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct JournalDocument {
    #[serde(default)]
    selective_sync: Vec<String>,
    #[serde(default)]
    folders: BTreeMap<String, FolderRecord>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
struct FolderRecord {
    #[serde(default)]
    avoid_read_on_next_sync: bool,
}

impl Journal {
    /// Opens the journal stored inside `source_dir`.
    ///
    /// A missing journal file yields an empty handle with
    /// [`exists`](Self::exists) returning `false` (first-run case). A present
    /// but unparseable document is logged and likewise treated as absent; the
    /// next [`flush`](Self::flush) replaces it with a well-formed baseline.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Read`] for I/O failures other than the file
    /// not existing.
    pub fn open(source_dir: &Path) -> Result<Self, JournalError> {
        Self::open_file(source_dir.join(JOURNAL_FILE_NAME))
    }

    /// Opens the journal at an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Read`] for I/O failures other than the file
    /// not existing.
    pub fn open_file(path: PathBuf) -> Result<Self, JournalError> {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(Self {
                    path,
                    existed: false,
                    doc: JournalDocument::default(),
                });
            }
            Err(source) => return Err(JournalError::Read { path, source }),
        };

        match serde_json::from_str(&text) {
            Ok(doc) => Ok(Self {
                path,
                existed: true,
                doc,
            }),
            Err(error) => {
                tracing::warn!(%error, path = %path.display(), "journal unreadable, starting fresh");
                Ok(Self {
                    path,
                    existed: false,
                    doc: JournalDocument::default(),
                })
            }
        }
    }

    /// Returns whether a persisted document was present when the handle was
    /// opened.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.existed
    }

    /// Returns the journal file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the selective-sync baseline persisted by the previous run.
    #[must_use]
    pub fn selective_sync_list(&self) -> SelectiveSyncList {
        SelectiveSyncList::from_folders(self.doc.selective_sync.iter().cloned())
    }

    /// Replaces the selective-sync baseline with `list`.
    pub fn set_selective_sync_list(&mut self, list: &SelectiveSyncList) {
        self.doc.selective_sync = list.to_vec();
    }

    /// Marks `folder`'s cached sync state as untrustworthy for the next pass,
    /// forcing a full re-scan of that subtree instead of trusting cached
    /// metadata.
    pub fn avoid_read_on_next_sync(&mut self, folder: &str) {
        let key = normalized(folder);
        tracing::debug!(folder = %key, "cached state invalidated");
        self.doc.folders.entry(key).or_default().avoid_read_on_next_sync = true;
    }

    /// Returns whether cached state for `folder` may still be trusted.
    #[must_use]
    pub fn is_cached_state_trusted(&self, folder: &str) -> bool {
        self.doc
            .folders
            .get(&normalized(folder))
            .is_none_or(|record| !record.avoid_read_on_next_sync)
    }

    /// Restores trust in `folder`'s cached state after a completed re-scan.
    pub fn restore_trust(&mut self, folder: &str) {
        if let Some(record) = self.doc.folders.get_mut(&normalized(folder)) {
            record.avoid_read_on_next_sync = false;
        }
    }

    /// Returns the folders whose cached state is currently untrusted.
    #[must_use]
    pub fn untrusted_folders(&self) -> Vec<String> {
        self.doc
            .folders
            .iter()
            .filter(|(_, record)| record.avoid_read_on_next_sync)
            .map(|(folder, _)| folder.clone())
            .collect()
    }

    /// Writes the document back to disk atomically (temp file + rename).
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Encode`] or [`JournalError::Write`] when the
    /// document cannot be serialized or persisted.
    pub fn flush(&mut self) -> Result<(), JournalError> {
        let encoded =
            serde_json::to_vec_pretty(&self.doc).map_err(|source| JournalError::Encode {
                path: self.path.clone(),
                source,
            })?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let write = |path: &Path| -> io::Result<()> {
            let mut file = NamedTempFile::new_in(dir)?;
            file.write_all(&encoded)?;
            file.persist(path).map_err(|error| error.error)?;
            Ok(())
        };
        write(&self.path).map_err(|source| JournalError::Write {
            path: self.path.clone(),
            source,
        })?;

        self.existed = true;
        Ok(())
    }
}

fn normalized(folder: &str) -> String {
    if folder.ends_with('/') {
        folder.to_owned()
    } else {
        format!("{folder}/")
    }
}
