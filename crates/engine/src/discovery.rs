use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use journal::{JOURNAL_FILE_NAME, Journal};

use crate::{EngineContext, EngineError, SyncEngine, SyncReport};

/// Bundled engine performing one local discovery pass.
///
/// The pass enumerates the local sync folder while honouring the exclude
/// set, the hidden-file policy, and the selective-sync list, consults the
/// journal for folders whose cached state was invalidated, and reports pass
/// statistics. Files younger than the configured minimum upload age are
/// deferred, which makes the pass request another run.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalDiscoveryEngine;

impl LocalDiscoveryEngine {
    /// Creates a discovery engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SyncEngine for LocalDiscoveryEngine {
    fn sync(&mut self, context: EngineContext) -> Result<SyncReport, EngineError> {
        if let Err(source) = fs::metadata(context.local_root()) {
            return Err(EngineError::LocalRoot {
                path: context.local_root().to_owned(),
                source,
            });
        }

        let mut journal = Journal::open_file(context.journal_path().to_owned())?;
        let untrusted = journal.untrusted_folders();
        if !untrusted.is_empty() {
            tracing::info!(
                folders = untrusted.len(),
                "cached state invalidated, re-scanning affected subtrees"
            );
        }

        let root: Arc<PathBuf> = Arc::new(context.local_root().to_owned());
        let excludes = context.excludes().clone();
        let selective: Arc<FxHashSet<String>> = Arc::new(
            context
                .selective_sync()
                .iter()
                .map(str::to_owned)
                .collect(),
        );
        let ignore_hidden = context.ignore_hidden_files();
        let excluded_count = Arc::new(AtomicU64::new(0));
        let skipped_count = Arc::new(AtomicU64::new(0));

        let walker = {
            let root = Arc::clone(&root);
            let excluded_count = Arc::clone(&excluded_count);
            let skipped_count = Arc::clone(&skipped_count);
            WalkDir::new(context.local_root())
                .skip_hidden(false)
                .follow_links(false)
                .process_read_dir(move |_depth, _dir_path, _state, children| {
                    children.retain(|result| {
                        let Ok(entry) = result else {
                            // keep read errors so the pass surfaces them
                            return true;
                        };
                        let name = entry.file_name.to_string_lossy();
                        if name == JOURNAL_FILE_NAME {
                            return false;
                        }
                        if ignore_hidden && name.starts_with('.') {
                            return false;
                        }

                        let path = entry.parent_path.join(&entry.file_name);
                        let Ok(rel) = path.strip_prefix(root.as_path()) else {
                            return true;
                        };
                        let is_dir = entry.file_type.is_dir();

                        if is_dir {
                            let key = format!("{}/", rel.to_string_lossy());
                            if selective.contains(&key) {
                                skipped_count.fetch_add(1, Ordering::Relaxed);
                                return false;
                            }
                        }
                        if excludes.is_excluded(rel, is_dir) {
                            excluded_count.fetch_add(1, Ordering::Relaxed);
                            return false;
                        }
                        true
                    });
                })
        };

        let min_age = context.minimum_file_age_for_upload();
        let mut files_seen = 0_u64;
        let mut files_deferred = 0_u64;
        for entry in walker {
            let entry = entry?;
            if !entry.file_type.is_file() {
                continue;
            }
            files_seen += 1;

            if !min_age.is_zero() {
                let path = entry.parent_path.join(&entry.file_name);
                let age = fs::metadata(&path)
                    .and_then(|meta| meta.modified())
                    .ok()
                    .and_then(|modified| SystemTime::now().duration_since(modified).ok());
                if age.is_some_and(|age| age < min_age) {
                    files_deferred += 1;
                }
            }
        }

        for folder in &untrusted {
            journal.restore_trust(folder);
        }
        journal.flush()?;

        let files_excluded = excluded_count.load(Ordering::Relaxed);
        let folders_skipped = skipped_count.load(Ordering::Relaxed);
        tracing::info!(
            remote = %context.display_url(),
            folder = context.folder(),
            files_seen,
            files_excluded,
            folders_skipped,
            files_deferred,
            "discovery pass finished"
        );

        Ok(SyncReport::new()
            .with_another_sync_needed(files_deferred > 0)
            .with_counts(files_seen, files_excluded, folders_skipped, files_deferred))
    }
}
